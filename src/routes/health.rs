use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::SharedState;

pub async fn liveness() -> &'static str {
    "Server is live and running. Ready for tasks."
}

/// Operational view of the background persistence path.
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    let sheets = if state.sheets.is_available() {
        "enabled"
    } else {
        "disabled"
    };

    Json(json!({
        "status": "ok",
        "sheets": sheets,
        "persistence_failures": state.dead_letter.failures(),
    }))
}
