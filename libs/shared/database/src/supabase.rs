use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::clinic::{
    Appointment, AvailabilityWindow, Doctor, Hospital, Invoice, Patient, PaymentStatus,
};

use crate::store::{ClinicStore, StoreError, StoreResult};

#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(anyhow::Error::new(match status.as_u16() {
                401 | 403 => SupabaseError::Auth(error_text),
                404 => SupabaseError::NotFound(error_text),
                409 => SupabaseError::Conflict(error_text),
                code => SupabaseError::Api { status: code, body: error_text },
            }));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Issues a request whose response body is ignored.
    pub async fn execute(&self, method: Method, path: &str) -> Result<()> {
        let _: Value = self.request_with_headers(method, path, None, Some(representation_headers())).await?;
        Ok(())
    }
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

fn to_store_error(err: anyhow::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Only the appointments table carries the slot reservation index, so a 409
/// means a lost reservation there and nowhere else.
fn to_reservation_error(err: anyhow::Error) -> StoreError {
    match err.downcast_ref::<SupabaseError>() {
        Some(SupabaseError::Conflict(_)) => StoreError::SlotTaken,
        _ => StoreError::Backend(err.to_string()),
    }
}

/// PostgREST-backed [`ClinicStore`].
///
/// Slot reservation relies on the partial unique index in
/// `migrations/0001_appointment_slot_reservation.sql`; PostgREST answers a
/// violating insert with 409.
pub struct SupabaseClinicStore {
    supabase: SupabaseClient,
}

impl SupabaseClinicStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn select<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Vec<T>> {
        self.supabase
            .request::<Vec<T>>(Method::GET, path, None)
            .await
            .map_err(to_store_error)
    }

    async fn select_one<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Option<T>> {
        Ok(self.select::<T>(path).await?.into_iter().next())
    }

    async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: Value,
        on_error: fn(anyhow::Error) -> StoreError,
    ) -> StoreResult<T> {
        let rows: Vec<T> = self
            .supabase
            .request_with_headers(
                Method::POST,
                &format!("/rest/v1/{}", table),
                Some(body),
                Some(representation_headers()),
            )
            .await
            .map_err(on_error)?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend(format!("insert into {} returned no rows", table)))
    }
}

#[async_trait]
impl ClinicStore for SupabaseClinicStore {
    async fn find_availability(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<AvailabilityWindow>> {
        let path = format!(
            "/rest/v1/doctor_availabilities?doctor_id=eq.{}&date=eq.{}&limit=1",
            doctor_id, date
        );
        self.select_one(&path).await
    }

    async fn find_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Vec<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_date=eq.{}",
            doctor_id, date
        );
        self.select(&path).await
    }

    async fn find_patient_appointments(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        payment_status: PaymentStatus,
    ) -> StoreResult<Vec<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&doctor_id=eq.{}&appointment_date=eq.{}&payment_status=eq.{}",
            patient_id, doctor_id, date, payment_status
        );
        self.select(&path).await
    }

    async fn find_appointment(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
        payment_status: PaymentStatus,
    ) -> StoreResult<Option<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_date=eq.{}&appointment_time_slot=eq.{}&payment_status=eq.{}&limit=1",
            doctor_id,
            date,
            urlencoding::encode(time_slot),
            payment_status
        );
        self.select_one(&path).await
    }

    async fn find_patient(&self, patient_id: Uuid) -> StoreResult<Option<Patient>> {
        self.select_one(&format!("/rest/v1/patients?patient_id=eq.{}&limit=1", patient_id))
            .await
    }

    async fn find_doctor(&self, doctor_id: Uuid) -> StoreResult<Option<Doctor>> {
        self.select_one(&format!("/rest/v1/doctors?doctor_id=eq.{}&limit=1", doctor_id))
            .await
    }

    async fn find_doctors_by_specialization(
        &self,
        specialization: &str,
    ) -> StoreResult<Vec<Doctor>> {
        let path = format!(
            "/rest/v1/doctors?specialization=eq.{}&approved=eq.true&order=name.asc",
            urlencoding::encode(specialization)
        );
        self.select(&path).await
    }

    async fn find_hospital(&self, hospital_id: Uuid) -> StoreResult<Option<Hospital>> {
        self.select_one(&format!("/rest/v1/hospitals?hospital_id=eq.{}&limit=1", hospital_id))
            .await
    }

    async fn create_appointment(&self, appointment: Appointment) -> StoreResult<Appointment> {
        let body = serde_json::to_value(&appointment)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.insert("appointments", body, to_reservation_error).await
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> StoreResult<()> {
        self.supabase
            .execute(
                Method::DELETE,
                &format!("/rest/v1/appointments?appointment_id=eq.{}", appointment_id),
            )
            .await
            .map_err(to_store_error)
    }

    async fn create_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let body = serde_json::to_value(&invoice)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.insert("invoices", body, to_store_error).await
    }
}
