use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::auth::AuthError;
use crate::models::ApiResponse;
use crate::utils::logging::{log_error, log_warning};

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    MethodNotAllowed,
    StateMismatch,
    NotAuthenticated,
    NotFound(String),
    UpstreamFailure(String),
    JsonError(serde_json::Error),
    HttpError(reqwest::Error),
    ConfigError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::StateMismatch => write!(f, "OAuth state mismatch"),
            AppError::NotAuthenticated => write!(f, "Not authenticated"),
            AppError::NotFound(what) => write!(f, "Not found: {}", what),
            AppError::UpstreamFailure(msg) => write!(f, "Upstream failure: {}", msg),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::HttpError(err) => write!(f, "HTTP error: {}", err),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpError(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::StateMismatch => AppError::StateMismatch,
            AuthError::NotAuthenticated => AppError::NotAuthenticated,
            AuthError::ExchangeFailure(msg) => {
                AppError::UpstreamFailure(format!("token exchange failed: {}", msg))
            }
            AuthError::Config(msg) => AppError::ConfigError(msg),
            AuthError::Store(err) => AppError::InternalError(format!("credential store: {}", err)),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::JsonError(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::StateMismatch | AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamFailure(_)
            | AppError::HttpError(_)
            | AppError::ConfigError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the caller. Only validation messages carry detail, and
    /// those name the offending field.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Invalid request method".to_string(),
            AppError::StateMismatch => "Invalid OAuth state".to_string(),
            AppError::NotAuthenticated => {
                "Not authenticated with Google Calendar. Please log in.".to_string()
            }
            AppError::NotFound(_) => "Not found".to_string(),
            AppError::JsonError(_) => "Invalid request body".to_string(),
            AppError::UpstreamFailure(_) | AppError::HttpError(_) => {
                "Upstream service request failed".to_string()
            }
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            log_error(&format!("❌ {} ({})", self, status.as_u16()));
        } else {
            log_warning(&format!("⚠️ {} ({})", self, status.as_u16()));
        }

        let body = ApiResponse::<()>::error(self.public_message());

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
