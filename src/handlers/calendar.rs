use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::models::{envelope, CalendarEventPayload, CalendarEventRequest};
use crate::utils::logging::*;
use crate::utils::AppResult;
use crate::AppState;

/// POST /api/calendar/event
///
/// The payload is validated before the credential is touched, so a bad
/// request never reaches the token endpoint or the calendar API.
pub async fn create_calendar_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Response> {
    let start_time = Instant::now();
    log_request_received("/api/calendar/event", "POST");

    let payload: CalendarEventPayload = serde_json::from_slice(&body)?;
    let event = CalendarEventRequest::try_from(payload)?;

    let token = state.oauth.authorized_token().await?;
    let created = state.calendar.create_event(&token, &event).await?;

    log_request_processed("/api/calendar/event", 201, start_time.elapsed().as_millis() as u64);
    Ok(envelope(StatusCode::CREATED, created))
}
