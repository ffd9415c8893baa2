pub mod config;
pub mod dead_letter;
pub mod error;
pub mod ping;
pub mod routes;
pub mod sheets;
pub mod sinks;
pub mod state;
pub mod submission;
pub mod worker;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::dead_letter::DeadLetter;
use crate::ping::Pinger;
use crate::sheets::SheetsAccess;
use crate::sinks::log_file::LogFileSink;
use crate::sinks::sheets::SheetsSink;
use crate::sinks::SinkRegistry;
use crate::state::{AppState, SharedState};
use crate::worker::WorkerHandle;

/// Build the router and start the background persistence worker.
/// Must be called from within a Tokio runtime.
pub fn build_app(config: Config) -> Result<(Router, WorkerHandle), String> {
    let http = reqwest::Client::builder()
        .user_agent(concat!("formsink/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

    let sheets = SheetsAccess::load(&config.sheets, http.clone());

    // Build sink registry
    let mut sinks = SinkRegistry::new();
    sinks.register(Arc::new(LogFileSink::new(config.log_path())));
    sinks.register(Arc::new(SheetsSink::new(sheets.clone())));

    let dead_letter = Arc::new(DeadLetter::new(config.dead_letter_file.clone()));
    let (dispatcher, worker) = worker::spawn(Arc::new(sinks), dead_letter.clone());

    let public_dir = config.public_dir.clone();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        pinger: Pinger::new(http, config.ping_url.clone()),
        config,
        sheets,
        dispatcher,
        dead_letter,
    });

    // Everything under the public dir is world-readable, the append log included.
    let app = Router::new()
        .merge(routes::app_routes())
        .fallback_service(ServeDir::new(public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state);

    Ok((app, worker))
}
