use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::envelope;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// Upper bound accepted by the search provider for one page
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// Kept as raw strings so malformed values produce an enveloped 400.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub max_results: Option<String>,
}

impl SearchParams {
    fn query(&self) -> AppResult<&str> {
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Ok(q),
            _ => {
                log_validation_error("q", "missing or blank");
                Err(AppError::ValidationError("Query parameter 'q' is required".to_string()))
            }
        }
    }

    fn max_results(&self, default: u32) -> AppResult<u32> {
        let Some(raw) = self.max_results.as_deref() else {
            return Ok(default);
        };

        match raw.trim().parse::<u32>() {
            Ok(n) if (1..=MAX_RESULTS_LIMIT).contains(&n) => Ok(n),
            _ => {
                log_validation_error("max_results", raw);
                Err(AppError::ValidationError(format!(
                    "Query parameter 'max_results' must be between 1 and {}",
                    MAX_RESULTS_LIMIT
                )))
            }
        }
    }
}

/// GET /api/search?q=...  (also mounted at /api/youtube)
pub async fn search_videos(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Response> {
    log_request_received("/api/search", "GET");

    let Query(params) = params.map_err(|rejection| {
        log_validation_error("query", &rejection.body_text());
        AppError::ValidationError("Malformed query string".to_string())
    })?;

    let query = params.query()?;
    let max_results = params.max_results(state.settings.search.max_results)?;

    let result = state.video_searcher.search_videos(query, max_results).await?;

    Ok(envelope(StatusCode::OK, result))
}
