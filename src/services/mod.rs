//! Upstream API clients
//!
//! Each third-party API sits behind a narrow capability trait so handlers can
//! be exercised with fakes.

pub mod calendar;
pub mod gemini;
pub mod youtube;

pub use calendar::GoogleCalendarClient;
pub use gemini::GeminiClient;
pub use youtube::YouTubeClient;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use crate::auth::Token;
use crate::models::CalendarEventRequest;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

const CONNECT_TIMEOUT_SECS: u64 = 5;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Raw provider response for a single-prompt generation.
    async fn generate_text(&self, prompt: &str) -> AppResult<Value>;
}

#[async_trait]
pub trait VideoSearcher: Send + Sync {
    /// Raw provider search result; its `items` array holds the videos.
    async fn search_videos(&self, query: &str, max_results: u32) -> AppResult<Value>;
}

#[async_trait]
pub trait CalendarEvents: Send + Sync {
    async fn create_event(&self, token: &Token, event: &CalendarEventRequest) -> AppResult<Value>;
}

pub(crate) fn build_http_client(timeout_secs: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| AppError::ConfigError(format!("failed to build HTTP client: {}", e)))
}

/// Transport failure. The URL is dropped since it may carry an API key.
pub(crate) fn transport_failure(service: &str, err: reqwest::Error) -> AppError {
    let err = err.without_url();
    log_upstream_error(service, None, &err.to_string());
    AppError::UpstreamFailure(format!("{} request failed: {}", service, err))
}

/// Body of a successful response as JSON; anything else is an upstream failure.
pub(crate) async fn read_json(service: &str, response: Response) -> AppResult<Value> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        log_upstream_error(service, Some(status.as_u16()), &error_text);
        return Err(AppError::UpstreamFailure(format!(
            "{} returned {}",
            service,
            status.as_u16()
        )));
    }

    response.json::<Value>().await.map_err(|e| {
        log_upstream_error(service, Some(status.as_u16()), "response body is not JSON");
        AppError::UpstreamFailure(format!("{} sent an unreadable body: {}", service, e.without_url()))
    })
}
