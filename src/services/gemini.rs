use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{build_http_client, read_json, transport_failure, TextGenerator};
use crate::config::GenerationSettings;
use crate::utils::logging::*;
use crate::utils::AppResult;

const SERVICE: &str = "gemini";

/// Gemini `generateContent` caller
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(settings: &GenerationSettings, api_key: impl Into<String>) -> AppResult<Self> {
        log_info(&format!("Gemini client initialized (model {})", settings.model));

        Ok(Self {
            client: build_http_client(settings.timeout_secs)?,
            api_key: api_key.into(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> AppResult<Value> {
        let request_body = json!({
            "contents": [
                {"parts": [{"text": prompt}]}
            ]
        });

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| transport_failure(SERVICE, e))?;

        read_json(SERVICE, response).await
    }
}
