use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde_json::{json, Value};

use super::{build_http_client, read_json, transport_failure, CalendarEvents};
use crate::auth::Token;
use crate::config::CalendarSettings;
use crate::models::CalendarEventRequest;
use crate::utils::logging::*;
use crate::utils::AppResult;

const SERVICE: &str = "google-calendar";

/// Google Calendar v3 `events.insert` caller
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    api_base: String,
    calendar_id: String,
    time_zone: String,
}

impl GoogleCalendarClient {
    pub fn new(settings: &CalendarSettings) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(settings.timeout_secs)?,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            calendar_id: settings.calendar_id.clone(),
            time_zone: settings.time_zone.clone(),
        })
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        )
    }

    fn event_body(&self, event: &CalendarEventRequest) -> Value {
        json!({
            "summary": event.summary,
            "description": event.description,
            "start": {
                "dateTime": event.start.to_rfc3339_opts(SecondsFormat::AutoSi, false),
                "timeZone": self.time_zone,
            },
            "end": {
                "dateTime": event.end.to_rfc3339_opts(SecondsFormat::AutoSi, false),
                "timeZone": self.time_zone,
            },
        })
    }
}

#[async_trait]
impl CalendarEvents for GoogleCalendarClient {
    async fn create_event(&self, token: &Token, event: &CalendarEventRequest) -> AppResult<Value> {
        let response = self
            .client
            .post(self.events_url())
            .header("Authorization", token.authorization_header())
            .json(&self.event_body(event))
            .send()
            .await
            .map_err(|e| transport_failure(SERVICE, e))?;

        let created = read_json(SERVICE, response).await?;

        log_info(&format!(
            "📅 [Calendar] Event created: {}",
            created.get("id").and_then(Value::as_str).unwrap_or("<no id>")
        ));

        Ok(created)
    }
}
