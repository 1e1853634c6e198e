use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;

/// Public directory routes, merged into the `/doctors` tree.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/specialization/{specialization}", get(handlers::get_doctors_by_specialization))
        .with_state(state)
}
