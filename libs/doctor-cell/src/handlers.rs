use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::DirectoryError;
use crate::services::DoctorDirectoryService;

fn to_app_error(err: DirectoryError) -> AppError {
    match err {
        DirectoryError::NoDoctors | DirectoryError::LocationNotFound => {
            AppError::NotFound(err.to_string())
        }
        DirectoryError::DatabaseError(_) => {
            AppError::Internal("Couldn't get doctors details".to_string())
        }
    }
}

#[axum::debug_handler]
pub async fn get_doctors_by_specialization(
    State(state): State<Arc<AppState>>,
    Path(specialization): Path<String>,
) -> Result<Json<Value>, AppError> {
    let directory = DoctorDirectoryService::new(Arc::clone(&state.store));

    let doctors = directory
        .doctors_by_specialization(&specialization)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "status": "success",
        "message": "Doctors details list fetched successfully",
        "data": doctors
    })))
}
