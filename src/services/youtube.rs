use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{build_http_client, read_json, transport_failure, VideoSearcher};
use crate::config::SearchSettings;
use crate::utils::logging::*;
use crate::utils::AppResult;

const SERVICE: &str = "youtube";

/// YouTube Data API v3 `search.list` caller
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl YouTubeClient {
    pub fn new(settings: &SearchSettings, api_key: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(settings.timeout_secs)?,
            api_key: api_key.into(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl VideoSearcher for YouTubeClient {
    async fn search_videos(&self, query: &str, max_results: u32) -> AppResult<Value> {
        log_info(&format!("🔎 [YouTube] Searching '{}' (max {})", query, max_results));

        let max_results = max_results.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.api_base))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_failure(SERVICE, e))?;

        read_json(SERVICE, response).await
    }
}
