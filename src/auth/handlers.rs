//! OAuth2 HTTP Handlers
//!
//! `GET /login/{provider}` starts the authorization-code flow and
//! `GET /callback/{provider}` completes it. Both answer with a 307 redirect;
//! the callback lands the browser back on the frontend either way.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::flow::FlowStatus;
use crate::models::envelope;
use crate::utils::logging::*;
use crate::utils::{truncate_safe, AppError, AppResult};
use crate::AppState;

pub const AUTH_SUCCESS_REDIRECT: &str = "/?google_auth_success=true";
pub const AUTH_FAILURE_REDIRECT: &str = "/";

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    state: Option<String>,
    code: Option<String>,
    /// Set by the provider when the user denies access
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub provider: String,
    pub status: FlowStatus,
}

fn ensure_provider(state: &AppState, provider: &str) -> AppResult<()> {
    if provider == state.settings.oauth.provider {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("OAuth provider '{}'", provider)))
    }
}

/// GET /login/{provider}
pub async fn start_oauth_flow(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> AppResult<Redirect> {
    log_request_received("/login", "GET");
    ensure_provider(&state, &provider)?;

    let auth_url = state.oauth.initiate().await;
    log_info(&format!("🚀 [OAuth2] Redirecting to {} authorization page", provider));

    Ok(Redirect::temporary(auth_url.as_str()))
}

/// GET /callback/{provider}?state=...&code=...
pub async fn handle_oauth_callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    params: Result<Query<OAuthCallbackParams>, QueryRejection>,
) -> AppResult<Redirect> {
    log_request_received("/callback", "GET");
    ensure_provider(&state, &provider)?;

    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            log_error(&format!("❌ [OAuth2] Unreadable callback query: {}", rejection));
            state.oauth.abandon_pending().await;
            return Ok(Redirect::temporary(AUTH_FAILURE_REDIRECT));
        }
    };

    if let Some(error) = params.error {
        log_error(&format!("❌ [OAuth2] Provider returned an error: {}", error));
        state.oauth.abandon_pending().await;
        return Ok(Redirect::temporary(AUTH_FAILURE_REDIRECT));
    }

    let (Some(callback_state), Some(code)) = (params.state, params.code) else {
        log_error("❌ [OAuth2] Callback is missing state or code");
        state.oauth.abandon_pending().await;
        return Ok(Redirect::temporary(AUTH_FAILURE_REDIRECT));
    };

    log_info(&format!("🔑 [OAuth2] Code received: {}...", truncate_safe(&code, 10)));

    match state.oauth.complete_callback(&callback_state, &code).await {
        Ok(_) => Ok(Redirect::temporary(AUTH_SUCCESS_REDIRECT)),
        Err(e) => {
            log_error(&format!("❌ [OAuth2] Authorization failed: {}", e));
            Ok(Redirect::temporary(AUTH_FAILURE_REDIRECT))
        }
    }
}

/// GET /auth/status
pub async fn auth_status(State(state): State<Arc<AppState>>) -> Response {
    let status = state.oauth.status().await;

    envelope(
        StatusCode::OK,
        AuthStatusResponse {
            provider: state.settings.oauth.provider.clone(),
            status,
        },
    )
}
