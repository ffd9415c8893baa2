use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, Submission};

/// Acknowledge first, persist later. The caller gets 200 once the body
/// parses, whatever happens to the writes afterwards.
pub async fn submit_form(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let fields = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(&headers, body).await
    } else {
        parser::parse_body(content_type, &body)
    }
    .map_err(AppError::BadRequest)?;

    let submission = Submission::new(fields);
    tracing::info!(
        "Form data received (submission {}, {} fields)",
        submission.id,
        submission.fields.len()
    );
    tracing::debug!("Submission {} fields: {:?}", submission.id, submission.fields);

    let id = submission.id;
    if !state.dispatcher.submit(submission) {
        tracing::error!("Persistence worker is not running; submission {id} was dropped");
    }

    Ok((StatusCode::OK, "Form data received. Processing in background."))
}
