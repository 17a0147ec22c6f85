use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Uniform JSON envelope for every API response: `{"data": ...}` on success,
/// `{"error": "..."}` on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { data: Some(data), error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { data: None, error: Some(message.into()) }
    }
}

/// Wraps `data` in the envelope and serializes it with `status`.
pub fn envelope<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::ok(data))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_omitted() {
        let ok = serde_json::to_value(ApiResponse::ok(json!({"items": []}))).unwrap();
        assert_eq!(ok, json!({"data": {"items": []}}));

        let err = serde_json::to_value(ApiResponse::<()>::error("Missing search query")).unwrap();
        assert_eq!(err, json!({"error": "Missing search query"}));
    }
}
