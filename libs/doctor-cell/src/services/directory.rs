use std::sync::Arc;

use tracing::{debug, error, warn};

use shared_database::ClinicStore;
use shared_models::clinic::Doctor;

use crate::models::{DirectoryError, DoctorInfo};

pub struct DoctorDirectoryService {
    store: Arc<dyn ClinicStore>,
}

impl DoctorDirectoryService {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    /// Approved doctors of a specialization, each with their hospital's
    /// location. The whole listing fails if any hospital is missing.
    pub async fn doctors_by_specialization(
        &self,
        specialization: &str,
    ) -> Result<Vec<DoctorInfo>, DirectoryError> {
        debug!("Listing doctors for specialization {}", specialization);

        let doctors = self
            .store
            .find_doctors_by_specialization(specialization)
            .await
            .map_err(|e| {
                error!("Failed to fetch doctors for {}: {}", specialization, e);
                DirectoryError::from(e)
            })?;

        if doctors.is_empty() {
            return Err(DirectoryError::NoDoctors);
        }

        let mut listing = Vec::with_capacity(doctors.len());
        for doctor in doctors {
            listing.push(self.with_location(doctor).await?);
        }

        debug!("Found {} doctors for {}", listing.len(), specialization);
        Ok(listing)
    }

    async fn with_location(&self, doctor: Doctor) -> Result<DoctorInfo, DirectoryError> {
        let hospital = self.store.find_hospital(doctor.hospital_id).await?;

        let Some(hospital) = hospital else {
            warn!("Hospital {} for doctor {} not found", doctor.hospital_id, doctor.doctor_id);
            return Err(DirectoryError::LocationNotFound);
        };

        Ok(DoctorInfo {
            name: doctor.name,
            age: doctor.age,
            gender: doctor.gender,
            speciality: doctor.specialization,
            experience: doctor.experience,
            location: hospital.location,
        })
    }
}
