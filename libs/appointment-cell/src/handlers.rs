// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{
    parse_date, AppointmentError, AvailableSlotsQuery, AvailableSlotsResponse,
    BookAppointmentPayload, BookAppointmentRequest,
};
use crate::services::{AppointmentBookingService, SlotAvailabilityService};

/// Maps booking failures onto HTTP errors. Storage detail stays in the logs.
fn to_app_error(err: AppointmentError) -> AppError {
    match err {
        AppointmentError::InvalidDate(_) => AppError::BadRequest("Invalid date format".to_string()),
        AppointmentError::AvailabilityNotFound => {
            AppError::NotFound("Doctor availability not found".to_string())
        }
        AppointmentError::SlotNotAvailable => {
            AppError::BadRequest("Appointment time slot not available".to_string())
        }
        AppointmentError::SlotConflict => AppError::Conflict(
            "Appointment has already been booked for the same date and time slot with the doctor".to_string(),
        ),
        AppointmentError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        AppointmentError::DuplicateBooking => AppError::Conflict(
            "Your appointment has already been booked with the same doctor on the same day".to_string(),
        ),
        AppointmentError::PersistenceError(_) => {
            AppError::Internal("Failed to process appointment request".to_string())
        }
    }
}

#[axum::debug_handler]
pub async fn get_available_time_slots(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    query: Result<Query<AvailableSlotsQuery>, QueryRejection>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        to_app_error(AppointmentError::InvalidDate(rejection.body_text()))
    })?;
    let date = parse_date(&query.date).map_err(to_app_error)?;

    let slot_service = SlotAvailabilityService::new(
        Arc::clone(&state.store),
        state.config.slot_interval_minutes,
    );

    let available_time_slots = slot_service
        .available_slots(doctor_id, date)
        .await
        .map_err(to_app_error)?;

    Ok(Json(AvailableSlotsResponse {
        date: query.date,
        available_time_slots,
    }))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookAppointmentPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let request = BookAppointmentRequest::try_from(payload).map_err(to_app_error)?;

    let booking_service = AppointmentBookingService::new(&state);

    let confirmation = booking_service
        .book_appointment(request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "status": "success",
        "message": "Appointment booked successfully",
        "appointment": confirmation.appointment,
        "invoice": confirmation.invoice
    })))
}
