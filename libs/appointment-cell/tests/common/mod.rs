#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use shared_database::{ClinicStore, InMemoryClinicStore, StoreError, StoreResult};
use shared_models::clinic::{
    Appointment, AvailabilityWindow, Doctor, Hospital, Invoice, Patient, PaymentStatus,
};

/// Delegates to an in-memory store but can be told to fail specific calls.
pub struct FaultyStore {
    pub inner: Arc<InMemoryClinicStore>,
    pub fail_invoice: AtomicBool,
    pub conflict_invoice: AtomicBool,
    pub fail_appointment_lookup: AtomicBool,
    pub fail_duplicate_lookup: AtomicBool,
}

impl FaultyStore {
    pub fn wrap(inner: Arc<InMemoryClinicStore>) -> Self {
        Self {
            inner,
            fail_invoice: AtomicBool::new(false),
            conflict_invoice: AtomicBool::new(false),
            fail_appointment_lookup: AtomicBool::new(false),
            fail_duplicate_lookup: AtomicBool::new(false),
        }
    }

    fn check(flag: &AtomicBool) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClinicStore for FaultyStore {
    async fn find_availability(&self, doctor_id: Uuid, date: NaiveDate) -> StoreResult<Option<AvailabilityWindow>> {
        self.inner.find_availability(doctor_id, date).await
    }

    async fn find_appointments(&self, doctor_id: Uuid, date: NaiveDate) -> StoreResult<Vec<Appointment>> {
        self.inner.find_appointments(doctor_id, date).await
    }

    async fn find_patient_appointments(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        payment_status: PaymentStatus,
    ) -> StoreResult<Vec<Appointment>> {
        Self::check(&self.fail_duplicate_lookup)?;
        self.inner.find_patient_appointments(patient_id, doctor_id, date, payment_status).await
    }

    async fn find_appointment(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
        payment_status: PaymentStatus,
    ) -> StoreResult<Option<Appointment>> {
        Self::check(&self.fail_appointment_lookup)?;
        self.inner.find_appointment(doctor_id, date, time_slot, payment_status).await
    }

    async fn find_patient(&self, patient_id: Uuid) -> StoreResult<Option<Patient>> {
        self.inner.find_patient(patient_id).await
    }

    async fn find_doctor(&self, doctor_id: Uuid) -> StoreResult<Option<Doctor>> {
        self.inner.find_doctor(doctor_id).await
    }

    async fn find_doctors_by_specialization(&self, specialization: &str) -> StoreResult<Vec<Doctor>> {
        self.inner.find_doctors_by_specialization(specialization).await
    }

    async fn find_hospital(&self, hospital_id: Uuid) -> StoreResult<Option<Hospital>> {
        self.inner.find_hospital(hospital_id).await
    }

    async fn create_appointment(&self, appointment: Appointment) -> StoreResult<Appointment> {
        self.inner.create_appointment(appointment).await
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> StoreResult<()> {
        self.inner.delete_appointment(appointment_id).await
    }

    async fn create_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        Self::check(&self.fail_invoice)?;
        if self.conflict_invoice.load(Ordering::SeqCst) {
            return Err(StoreError::SlotTaken);
        }
        self.inner.create_invoice(invoice).await
    }
}
