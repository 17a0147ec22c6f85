//! Calendar event request: raw JSON payload and its validated form.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::utils::logging::log_validation_error;
use crate::utils::{AppError, AppResult};

/// Body of `POST /api/calendar/event` as sent by the frontend.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarEventPayload {
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A validated event, ready to hand to the calendar client.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEventRequest {
    pub summary: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TryFrom<CalendarEventPayload> for CalendarEventRequest {
    type Error = AppError;

    fn try_from(payload: CalendarEventPayload) -> AppResult<Self> {
        let summary = required("summary", payload.summary)?;
        let start = parse_timestamp("start", required("start", payload.start)?)?;
        let end = parse_timestamp("end", required("end", payload.end)?)?;

        if start > end {
            log_validation_error("start", "start is after end");
            return Err(AppError::ValidationError(
                "Field 'start' must not be after 'end'".to_string(),
            ));
        }

        Ok(Self {
            summary,
            description: payload.description.unwrap_or_default(),
            start,
            end,
        })
    }
}

fn required(field: &str, value: Option<String>) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            log_validation_error(field, "missing or empty");
            Err(AppError::ValidationError(format!("Missing required field: {}", field)))
        }
    }
}

fn parse_timestamp(field: &str, value: String) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|e| {
        log_validation_error(field, &e.to_string());
        AppError::ValidationError(format!("Field '{}' must be an RFC-3339 timestamp", field))
    })
}
