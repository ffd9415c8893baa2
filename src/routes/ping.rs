use axum::extract::State;
use axum::http::StatusCode;

use crate::error::AppError;
use crate::state::SharedState;

pub async fn run_ping_job(
    State(state): State<SharedState>,
) -> Result<(StatusCode, &'static str), AppError> {
    let url = state.pinger.url();
    tracing::info!("Ping job started");

    match state.pinger.ping().await {
        Ok(status) => {
            tracing::info!("Successfully pinged {url} (HTTP {status})");
            Ok((StatusCode::OK, "Ping successful!"))
        }
        Err(e) => {
            tracing::error!("Failed to ping {url}: {e}");
            Err(AppError::PingFailed(e))
        }
    }
}
