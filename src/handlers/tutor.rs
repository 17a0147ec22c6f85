use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::models::envelope;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TutorRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// /api/tutor
///
/// Mounted for every method so that anything other than POST gets the
/// enveloped 405 instead of the router's bare one.
pub async fn handle_tutor(
    method: Method,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Response> {
    let start_time = Instant::now();
    log_request_received("/api/tutor", method.as_str());

    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let request: TutorRequest = serde_json::from_slice(&body)?;
    let prompt = request
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            log_validation_error("prompt", "missing or empty");
            AppError::ValidationError("Field 'prompt' is required".to_string())
        })?;

    let result = state.text_generator.generate_text(&prompt).await?;

    log_request_processed("/api/tutor", 200, start_time.elapsed().as_millis() as u64);
    Ok(envelope(StatusCode::OK, result))
}
