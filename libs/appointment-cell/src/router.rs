// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_database::AppState;

use crate::handlers;

/// Mounted under `/appointments`.
pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .with_state(state)
}

/// Mounted under `/doctors`.
pub fn availability_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/{doctor_id}/available-slots", get(handlers::get_available_time_slots))
        .with_state(state)
}
