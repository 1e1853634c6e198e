use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::{appointment_routes, availability_routes};
use doctor_cell::router::doctor_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic booking API is running!" }))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest(
            "/doctors",
            availability_routes(state.clone()).merge(doctor_routes(state)),
        )
}
