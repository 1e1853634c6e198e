use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::clinic::{
    Appointment, AvailabilityWindow, Doctor, Hospital, Invoice, Patient, PaymentStatus,
};

use crate::store::{ClinicStore, StoreError, StoreResult};

/// Slot identity for the reservation check: the parsed `HH:MM-HH:MM` bounds,
/// or the trimmed text when the slot does not parse.
fn slot_key(raw: &str) -> Result<(NaiveTime, NaiveTime), &str> {
    let parsed = raw.split_once('-').and_then(|(start, end)| {
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
        Some((start, end))
    });
    parsed.ok_or_else(|| raw.trim())
}

#[derive(Default)]
struct Tables {
    availabilities: Vec<AvailabilityWindow>,
    appointments: Vec<Appointment>,
    invoices: Vec<Invoice>,
    patients: HashMap<Uuid, Patient>,
    doctors: HashMap<Uuid, Doctor>,
    hospitals: HashMap<Uuid, Hospital>,
}

/// Process-local store. Every table sits behind one lock so the conditional
/// appointment insert is a single critical section.
#[derive(Default)]
pub struct InMemoryClinicStore {
    tables: RwLock<Tables>,
}

impl InMemoryClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_availability(&self, window: AvailabilityWindow) {
        let mut tables = self.tables.write().await;
        tables
            .availabilities
            .retain(|w| !(w.doctor_id == window.doctor_id && w.date == window.date));
        tables.availabilities.push(window);
    }

    pub async fn insert_patient(&self, patient: Patient) {
        self.tables.write().await.patients.insert(patient.patient_id, patient);
    }

    pub async fn insert_doctor(&self, doctor: Doctor) {
        self.tables.write().await.doctors.insert(doctor.doctor_id, doctor);
    }

    pub async fn insert_hospital(&self, hospital: Hospital) {
        self.tables.write().await.hospitals.insert(hospital.hospital_id, hospital);
    }

    /// Seeds an appointment as-is, skipping the slot reservation check.
    pub async fn insert_appointment(&self, appointment: Appointment) {
        self.tables.write().await.appointments.push(appointment);
    }

    pub async fn set_payment_status(&self, appointment_id: Uuid, status: PaymentStatus) -> bool {
        let mut tables = self.tables.write().await;
        match tables.appointments.iter_mut().find(|a| a.appointment_id == appointment_id) {
            Some(appointment) => {
                appointment.payment_status = status;
                true
            }
            None => false,
        }
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.tables.read().await.appointments.clone()
    }

    pub async fn invoices(&self) -> Vec<Invoice> {
        self.tables.read().await.invoices.clone()
    }
}

#[async_trait]
impl ClinicStore for InMemoryClinicStore {
    async fn find_availability(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<AvailabilityWindow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .availabilities
            .iter()
            .find(|w| w.doctor_id == doctor_id && w.date == date)
            .cloned())
    }

    async fn find_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Vec<Appointment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.appointment_date == date)
            .cloned()
            .collect())
    }

    async fn find_patient_appointments(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        payment_status: PaymentStatus,
    ) -> StoreResult<Vec<Appointment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .filter(|a| {
                a.patient_id == patient_id
                    && a.doctor_id == doctor_id
                    && a.appointment_date == date
                    && a.payment_status == payment_status
            })
            .cloned()
            .collect())
    }

    async fn find_appointment(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
        payment_status: PaymentStatus,
    ) -> StoreResult<Option<Appointment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .find(|a| {
                a.doctor_id == doctor_id
                    && a.appointment_date == date
                    && a.appointment_time_slot == time_slot
                    && a.payment_status == payment_status
            })
            .cloned())
    }

    async fn find_patient(&self, patient_id: Uuid) -> StoreResult<Option<Patient>> {
        Ok(self.tables.read().await.patients.get(&patient_id).cloned())
    }

    async fn find_doctor(&self, doctor_id: Uuid) -> StoreResult<Option<Doctor>> {
        Ok(self.tables.read().await.doctors.get(&doctor_id).cloned())
    }

    async fn find_doctors_by_specialization(
        &self,
        specialization: &str,
    ) -> StoreResult<Vec<Doctor>> {
        let tables = self.tables.read().await;
        let mut doctors: Vec<Doctor> = tables
            .doctors
            .values()
            .filter(|d| d.approved && d.specialization == specialization)
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }

    async fn find_hospital(&self, hospital_id: Uuid) -> StoreResult<Option<Hospital>> {
        Ok(self.tables.read().await.hospitals.get(&hospital_id).cloned())
    }

    async fn create_appointment(&self, appointment: Appointment) -> StoreResult<Appointment> {
        let mut tables = self.tables.write().await;

        let requested = slot_key(&appointment.appointment_time_slot);
        let taken = tables.appointments.iter().any(|existing| {
            existing.occupies_slot()
                && existing.doctor_id == appointment.doctor_id
                && existing.appointment_date == appointment.appointment_date
                && slot_key(&existing.appointment_time_slot) == requested
        });
        if taken {
            debug!(
                "Reservation refused for doctor {} on {} at {}",
                appointment.doctor_id, appointment.appointment_date, appointment.appointment_time_slot
            );
            return Err(StoreError::SlotTaken);
        }

        tables.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.appointments.len();
        tables.appointments.retain(|a| a.appointment_id != appointment_id);
        if tables.appointments.len() == before {
            return Err(StoreError::Backend(format!("appointment {} not found", appointment_id)));
        }
        Ok(())
    }

    async fn create_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        self.tables.write().await.invoices.push(invoice.clone());
        Ok(invoice)
    }
}
