use std::sync::Arc;
use tracing::{debug, error, warn};

use shared_database::ClinicStore;
use shared_models::clinic::{Patient, PaymentStatus};

use crate::models::{AppointmentError, BookAppointmentRequest, TimeSlot};
use crate::services::availability::SlotAvailabilityService;

/// A request that passed every check, with the values the checks resolved.
#[derive(Debug, Clone)]
pub struct ValidatedBooking {
    pub slot: TimeSlot,
    pub patient: Patient,
}

/// Ordered booking gate. Each check fails fast with its own error:
/// availability, slot membership, paid conflict, patient, same-day duplicate.
pub struct BookingValidator {
    store: Arc<dyn ClinicStore>,
    availability: SlotAvailabilityService,
}

impl BookingValidator {
    pub fn new(store: Arc<dyn ClinicStore>, interval_minutes: i64) -> Self {
        Self {
            availability: SlotAvailabilityService::new(Arc::clone(&store), interval_minutes),
            store,
        }
    }

    pub async fn validate(
        &self,
        request: &BookAppointmentRequest,
    ) -> Result<ValidatedBooking, AppointmentError> {
        let slot = self.check_slot_offered(request).await?;
        self.check_no_paid_conflict(request, &slot).await?;
        let patient = self.check_patient_exists(request).await?;
        self.check_no_duplicate_same_day(request).await?;

        debug!(
            "Booking request for doctor {} at {} {} passed validation",
            request.doctor_id, request.appointment_date, slot
        );

        Ok(ValidatedBooking { slot, patient })
    }

    /// Availability must exist and the requested slot must be one of the
    /// slots it divides into. Compared as parsed ranges, so spacing in the
    /// request does not matter.
    async fn check_slot_offered(
        &self,
        request: &BookAppointmentRequest,
    ) -> Result<TimeSlot, AppointmentError> {
        let window = self
            .availability
            .find_window(request.doctor_id, request.appointment_date)
            .await?;

        let requested = request.appointment_time_slot.parse::<TimeSlot>().map_err(|e| {
            warn!("Unreadable requested slot {:?}: {}", request.appointment_time_slot, e);
            AppointmentError::SlotNotAvailable
        })?;

        if !self.availability.candidate_slots(&window).contains(&requested) {
            warn!(
                "Slot {} is outside doctor {}'s availability {:?}",
                requested, request.doctor_id, window.available_time
            );
            return Err(AppointmentError::SlotNotAvailable);
        }

        Ok(requested)
    }

    /// Only paid appointments block here; unpaid holds are caught by the
    /// store's reservation when the appointment is written.
    async fn check_no_paid_conflict(
        &self,
        request: &BookAppointmentRequest,
        slot: &TimeSlot,
    ) -> Result<(), AppointmentError> {
        let existing = self
            .store
            .find_appointment(
                request.doctor_id,
                request.appointment_date,
                &slot.to_string(),
                PaymentStatus::Paid,
            )
            .await
            .map_err(|e| {
                error!("Error checking for existing appointment: {}", e);
                AppointmentError::from(e)
            })?;

        if existing.is_some() {
            warn!(
                "Slot {} on {} with doctor {} is already paid for",
                slot, request.appointment_date, request.doctor_id
            );
            return Err(AppointmentError::SlotConflict);
        }

        Ok(())
    }

    async fn check_patient_exists(
        &self,
        request: &BookAppointmentRequest,
    ) -> Result<Patient, AppointmentError> {
        self.store
            .find_patient(request.patient_id)
            .await
            .map_err(|e| {
                error!("Error loading patient {}: {}", request.patient_id, e);
                AppointmentError::from(e)
            })?
            .ok_or(AppointmentError::PatientNotFound)
    }

    async fn check_no_duplicate_same_day(
        &self,
        request: &BookAppointmentRequest,
    ) -> Result<(), AppointmentError> {
        let paid = self
            .store
            .find_patient_appointments(
                request.patient_id,
                request.doctor_id,
                request.appointment_date,
                PaymentStatus::Paid,
            )
            .await
            .map_err(|e| {
                error!("Error checking for existing appointments: {}", e);
                AppointmentError::from(e)
            })?;

        if !paid.is_empty() {
            warn!(
                "Patient {} already has {} paid appointment(s) with doctor {} on {}",
                request.patient_id,
                paid.len(),
                request.doctor_id,
                request.appointment_date
            );
            return Err(AppointmentError::DuplicateBooking);
        }

        Ok(())
    }
}
