use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use shared_models::clinic::{
    Appointment, AvailabilityWindow, Doctor, Hospital, Invoice, Patient, PaymentStatus,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A conditional appointment insert lost against an existing active
    /// booking for the same doctor, date and slot.
    #[error("Time slot is already reserved")]
    SlotTaken,

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data-access port used by the booking and directory cells.
///
/// Lookups return `Ok(None)` / an empty list for "not found"; `Err` is only
/// for genuine storage failures.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    async fn find_availability(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<AvailabilityWindow>>;

    async fn find_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Vec<Appointment>>;

    async fn find_patient_appointments(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        payment_status: PaymentStatus,
    ) -> StoreResult<Vec<Appointment>>;

    async fn find_appointment(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
        payment_status: PaymentStatus,
    ) -> StoreResult<Option<Appointment>>;

    async fn find_patient(&self, patient_id: Uuid) -> StoreResult<Option<Patient>>;

    async fn find_doctor(&self, doctor_id: Uuid) -> StoreResult<Option<Doctor>>;

    async fn find_doctors_by_specialization(
        &self,
        specialization: &str,
    ) -> StoreResult<Vec<Doctor>>;

    async fn find_hospital(&self, hospital_id: Uuid) -> StoreResult<Option<Hospital>>;

    /// Inserts the appointment only if no active appointment already holds
    /// the same (doctor, date, slot). Fails with [`StoreError::SlotTaken`]
    /// otherwise.
    async fn create_appointment(&self, appointment: Appointment) -> StoreResult<Appointment>;

    async fn delete_appointment(&self, appointment_id: Uuid) -> StoreResult<()>;

    async fn create_invoice(&self, invoice: Invoice) -> StoreResult<Invoice>;
}
