pub mod health;
pub mod ping;
pub mod submit;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn app_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(health::liveness))
        .route("/health", get(health::health))
        .route("/run-ping-job", get(ping::run_ping_job))
        .route("/submit-form", post(submit::submit_form))
}
