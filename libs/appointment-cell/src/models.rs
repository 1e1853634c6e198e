// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use shared_database::StoreError;
use shared_models::clinic::{Appointment, Invoice};

/// Wire format of a time of day inside a slot string.
pub const TIME_FORMAT: &str = "%H:%M";

/// Wire format of appointment dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==============================================================================
// TIME SLOTS
// ==============================================================================

/// A half-open `[start, end)` range of the day, rendered as `"HH:MM-HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

impl FromStr for TimeSlot {
    type Err = TimeRangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        crate::services::time_window::parse_time_range(raw)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeRangeError {
    #[error("time range must look like HH:MM-HH:MM, got {0:?}")]
    MissingSeparator(String),

    #[error("invalid time of day {0:?}")]
    InvalidTime(String),
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: uuid::Uuid,
    pub patient_id: uuid::Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time_slot: String,
}

/// Booking body as received. The date stays raw so a malformed value is
/// reported as [`AppointmentError::InvalidDate`].
#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentPayload {
    pub doctor_id: uuid::Uuid,
    pub patient_id: uuid::Uuid,
    pub appointment_date: String,
    pub appointment_time_slot: String,
}

impl TryFrom<BookAppointmentPayload> for BookAppointmentRequest {
    type Error = AppointmentError;

    fn try_from(payload: BookAppointmentPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            doctor_id: payload.doctor_id,
            patient_id: payload.patient_id,
            appointment_date: parse_date(&payload.appointment_date)?,
            appointment_time_slot: payload.appointment_time_slot,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableSlotsResponse {
    pub date: String,
    pub available_time_slots: Vec<TimeSlot>,
}

/// Result of a successful booking: both records as persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub appointment: Appointment,
    pub invoice: Invoice,
}

/// Tunables for slot generation and invoicing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingPolicy {
    pub slot_interval_minutes: i64,
    pub invoice_surcharge: f64,
    pub payment_due_days: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            slot_interval_minutes: 30,
            invoice_surcharge: 50.0,
            payment_due_days: 1,
        }
    }
}

impl From<&shared_config::AppConfig> for BookingPolicy {
    fn from(config: &shared_config::AppConfig) -> Self {
        Self {
            slot_interval_minutes: config.slot_interval_minutes,
            invoice_surcharge: config.invoice_surcharge,
            payment_due_days: config.payment_due_days,
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Doctor availability not found")]
    AvailabilityNotFound,

    #[error("Appointment time slot not available")]
    SlotNotAvailable,

    #[error("Appointment has already been booked for the same date and time slot with the doctor")]
    SlotConflict,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment has already been booked with the same doctor on the same day")]
    DuplicateBooking,

    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlotTaken => AppointmentError::SlotConflict,
            StoreError::Backend(msg) => AppointmentError::PersistenceError(msg),
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppointmentError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppointmentError::InvalidDate(raw.to_string()))
}
