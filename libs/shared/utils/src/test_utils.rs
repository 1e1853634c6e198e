use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{AppState, InMemoryClinicStore};
use shared_models::clinic::{
    Appointment, AvailabilityWindow, BookingStatus, Doctor, Hospital, Patient, PaymentStatus,
};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            ..AppConfig::default()
        }
    }
}

/// A seeded in-memory clinic: one hospital, one approved doctor with a
/// consultancy charge of 100, one patient.
pub struct ClinicFixture {
    pub store: Arc<InMemoryClinicStore>,
    pub hospital: Hospital,
    pub doctor: Doctor,
    pub patient: Patient,
    pub date: NaiveDate,
}

impl ClinicFixture {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryClinicStore::new());

        let hospital = Hospital {
            hospital_id: Uuid::new_v4(),
            name: "City General".to_string(),
            location: "Kochi".to_string(),
        };
        let doctor = Doctor {
            doctor_id: Uuid::new_v4(),
            name: "Dr. Meera Nair".to_string(),
            age: 42,
            gender: "female".to_string(),
            specialization: "cardiology".to_string(),
            experience: 15,
            consultancy_charge: 100.0,
            hospital_id: hospital.hospital_id,
            approved: true,
        };
        let patient = Patient {
            patient_id: Uuid::new_v4(),
            name: "Test Patient".to_string(),
        };

        store.insert_hospital(hospital.clone()).await;
        store.insert_doctor(doctor.clone()).await;
        store.insert_patient(patient.clone()).await;

        Self {
            store,
            hospital,
            doctor,
            patient,
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
        }
    }

    pub async fn with_availability(self, available_time: &str) -> Self {
        self.store
            .insert_availability(AvailabilityWindow {
                doctor_id: self.doctor.doctor_id,
                date: self.date,
                available_time: available_time.to_string(),
            })
            .await;
        self
    }

    /// Seeds an existing booking for the fixture doctor and date.
    pub async fn book(&self, patient_id: Uuid, slot: &str, payment_status: PaymentStatus) -> Appointment {
        let appointment = Appointment {
            appointment_id: Uuid::new_v4(),
            doctor_id: self.doctor.doctor_id,
            patient_id,
            appointment_date: self.date,
            appointment_time_slot: slot.to_string(),
            booking_status: BookingStatus::Pending,
            payment_status,
            created_at: Utc::now(),
        };
        self.store.insert_appointment(appointment.clone()).await;
        appointment
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(TestConfig::default().to_app_config(), self.store.clone()))
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn availability_response(doctor_id: Uuid, date: &str, available_time: &str) -> serde_json::Value {
        json!({
            "doctor_id": doctor_id,
            "date": date,
            "available_time": available_time
        })
    }

    pub fn doctor_response(doctor_id: Uuid, hospital_id: Uuid, consultancy_charge: f64) -> serde_json::Value {
        json!({
            "doctor_id": doctor_id,
            "name": "Dr. Test",
            "age": 40,
            "gender": "male",
            "specialization": "general",
            "experience": 10,
            "consultancy_charge": consultancy_charge,
            "hospital_id": hospital_id,
            "approved": true
        })
    }

    pub fn patient_response(patient_id: Uuid) -> serde_json::Value {
        json!({
            "patient_id": patient_id,
            "name": "Test Patient"
        })
    }
}
