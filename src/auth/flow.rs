//! OAuth Flow Controller
//!
//! Drives the authorization-code grant: hands out the authorization URL,
//! checks the anti-forgery state on callback, exchanges the code and keeps
//! the resulting token in the credential store.

use serde::Serialize;
use tokio::sync::Mutex;
use url::Url;

use super::client::OAuth2Client;
use super::error::{AuthError, AuthResult};
use super::token::Token;
use super::token_store::CredentialStore;
use crate::utils::logging::*;
use crate::utils::truncate_safe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    Unauthenticated,
    PendingCallback,
    Authenticated,
}

pub struct OAuthFlowController {
    client: OAuth2Client,
    store: CredentialStore,
    pending_state: Mutex<Option<String>>,
}

impl OAuthFlowController {
    pub fn new(client: OAuth2Client, store: CredentialStore) -> Self {
        Self {
            client,
            store,
            pending_state: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Starts a new authorization attempt with a random state.
    pub async fn initiate(&self) -> Url {
        let state = oauth2::CsrfToken::new_random().secret().clone();
        self.initiate_with_state(state).await
    }

    /// Starts a new authorization attempt with the given state. Any earlier
    /// pending attempt is abandoned.
    pub async fn initiate_with_state(&self, state: impl Into<String>) -> Url {
        let state = state.into();
        let url = self.client.authorization_url(&state);

        let mut pending = self.pending_state.lock().await;
        if pending.is_some() {
            log_warning("⚠️  [OAuth2] Replacing an unfinished authorization attempt");
        }
        *pending = Some(state);

        url
    }

    pub async fn complete_callback(&self, state: &str, code: &str) -> AuthResult<Token> {
        // The pending state is single use, whatever the outcome.
        let expected = self.pending_state.lock().await.take();

        match expected {
            Some(expected) if expected == state => {}
            Some(_) => {
                log_warning(&format!(
                    "⚠️  [OAuth2] Callback state mismatch (received {}...)",
                    truncate_safe(state, 8)
                ));
                return Err(AuthError::StateMismatch);
            }
            None => {
                log_warning("⚠️  [OAuth2] Callback received with no authorization pending");
                return Err(AuthError::StateMismatch);
            }
        }

        let token = self.client.exchange_code(code).await?;
        self.store.save(&token).await?;

        log_info("✅ [OAuth2] Authorization completed, credential stored");
        Ok(token)
    }

    /// Drops the pending authorization attempt, for callbacks that cannot be
    /// completed at all (provider error, missing parameters).
    pub async fn abandon_pending(&self) {
        if self.pending_state.lock().await.take().is_some() {
            log_info("[OAuth2] Pending authorization attempt discarded");
        }
    }

    /// Reads the stored token without checking its expiry.
    pub async fn load_active_token(&self) -> AuthResult<Token> {
        self.store.load().await.map_err(|e| {
            log_warning(&format!("⚠️  [OAuth2] No usable credential: {}", e));
            AuthError::NotAuthenticated
        })
    }

    /// Stored token, refreshed first when it has expired and a refresh token
    /// is available.
    pub async fn authorized_token(&self) -> AuthResult<Token> {
        let token = self.load_active_token().await?;

        if !token.is_expired() {
            return Ok(token);
        }

        let Some(refresh_token) = token.refresh_token.as_deref() else {
            log_warning("⚠️  [OAuth2] Stored credential expired and has no refresh token");
            return Err(AuthError::NotAuthenticated);
        };

        let refreshed = self.client.refresh(refresh_token).await.map_err(|e| {
            log_error(&format!("❌ [OAuth2] Token refresh failed: {}", e));
            AuthError::NotAuthenticated
        })?;
        self.store.save(&refreshed).await?;

        Ok(refreshed)
    }

    pub async fn status(&self) -> FlowStatus {
        if self.pending_state.lock().await.is_some() {
            FlowStatus::PendingCallback
        } else if self.store.load().await.is_ok() {
            FlowStatus::Authenticated
        } else {
            FlowStatus::Unauthenticated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::config::ClientConfiguration;
    use chrono::{Duration as ChronoDuration, Utc};
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn controller(token_url: String) -> (OAuthFlowController, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfiguration {
            client_id: "client-123".to_string(),
            client_secret: "secret-456".to_string(),
            auth_url: "https://accounts.example.com/o/oauth2/auth".to_string(),
            token_url,
            redirect_uri: "http://localhost:8080/callback/google".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar.events".to_string()],
        };
        let client = OAuth2Client::new(&config, Duration::from_secs(5)).unwrap();
        let store = CredentialStore::new(dir.path().join("token.json"));

        (OAuthFlowController::new(client, store), dir)
    }

    #[tokio::test]
    async fn test_full_authorization_scenario() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token").body_contains("code=abc");
                then.status(200)
                    .json_body(json!({"access_token": "T", "token_type": "Bearer", "expires_in": 3600}));
            })
            .await;

        let (flow, _dir) = controller(server.url("/token"));
        assert_eq!(flow.status().await, FlowStatus::Unauthenticated);

        let url = flow.initiate_with_state("s1").await;
        assert!(url.query_pairs().any(|(k, v)| k == "state" && v == "s1"));
        assert_eq!(flow.status().await, FlowStatus::PendingCallback);

        let issued = flow.complete_callback("s1", "abc").await.unwrap();
        let loaded = flow.load_active_token().await.unwrap();

        assert_eq!(loaded.access_token, "T");
        assert_eq!(loaded, issued);
        assert_eq!(flow.status().await, FlowStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_state_mismatch_writes_nothing() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "T", "token_type": "Bearer"}));
            })
            .await;

        let (flow, _dir) = controller(server.url("/token"));
        flow.initiate_with_state("s1").await;

        let err = flow.complete_callback("forged", "abc").await.unwrap_err();

        assert!(matches!(err, AuthError::StateMismatch));
        token_mock.assert_hits_async(0).await;
        assert!(!flow.store().exists().await);
        assert!(matches!(flow.load_active_token().await, Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_pending_state_is_single_use() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "T", "token_type": "Bearer"}));
            })
            .await;

        let (flow, _dir) = controller(server.url("/token"));
        flow.initiate_with_state("s1").await;
        assert!(flow.complete_callback("wrong", "abc").await.is_err());

        let err = flow.complete_callback("s1", "abc").await.unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch));
    }

    #[tokio::test]
    async fn test_callback_without_initiate_is_rejected() {
        let (flow, _dir) = controller("http://127.0.0.1:9/token".to_string());
        let err = flow.complete_callback("s1", "abc").await.unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch));
    }

    #[tokio::test]
    async fn test_latest_initiate_wins() {
        let (flow, _dir) = controller("http://127.0.0.1:9/token".to_string());

        let first = flow.initiate().await;
        let second = flow.initiate().await;
        assert_ne!(first, second);

        let first_state = first
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let err = flow.complete_callback(&first_state, "abc").await.unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch));
    }

    #[tokio::test]
    async fn test_exchange_failure_keeps_previous_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(400).json_body(json!({"error": "invalid_grant"}));
            })
            .await;

        let (flow, _dir) = controller(server.url("/token"));
        let previous = Token::new("OLD", "Bearer", None, None);
        flow.store().save(&previous).await.unwrap();

        flow.initiate_with_state("s1").await;
        let err = flow.complete_callback("s1", "abc").await.unwrap_err();

        assert!(matches!(err, AuthError::ExchangeFailure(_)));
        assert_eq!(flow.load_active_token().await.unwrap(), previous);
        assert_eq!(flow.status().await, FlowStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_store_write_failure_is_surfaced() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(json!({"access_token": "T", "token_type": "Bearer", "expires_in": 3600}));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let config = ClientConfiguration {
            client_id: "client-123".to_string(),
            client_secret: "secret-456".to_string(),
            auth_url: "https://accounts.example.com/o/oauth2/auth".to_string(),
            token_url: server.url("/token"),
            redirect_uri: "http://localhost:8080/callback/google".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar.events".to_string()],
        };
        let flow = OAuthFlowController::new(
            OAuth2Client::new(&config, Duration::from_secs(5)).unwrap(),
            CredentialStore::new(blocker.join("token.json")),
        );

        flow.initiate_with_state("s1").await;
        let err = flow.complete_callback("s1", "abc").await.unwrap_err();

        assert!(matches!(err, AuthError::Store(_)));
        token_mock.assert_hits_async(1).await;
        assert_eq!(flow.status().await, FlowStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_abandon_pending() {
        let (flow, _dir) = controller("http://127.0.0.1:9/token".to_string());
        flow.initiate_with_state("s1").await;

        flow.abandon_pending().await;

        assert_eq!(flow.status().await, FlowStatus::Unauthenticated);
        let err = flow.complete_callback("s1", "abc").await.unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch));
    }

    #[tokio::test]
    async fn test_corrupt_store_is_not_authenticated() {
        let (flow, _dir) = controller("http://127.0.0.1:9/token".to_string());
        std::fs::write(flow.store().path(), "garbage").unwrap();

        assert!(matches!(flow.load_active_token().await, Err(AuthError::NotAuthenticated)));
        assert_eq!(flow.status().await, FlowStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_authorized_token_refreshes_expired_credential() {
        let server = MockServer::start_async().await;
        let refresh_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .body_contains("grant_type=refresh_token")
                    .body_contains("refresh_token=R");
                then.status(200)
                    .json_body(json!({"access_token": "T2", "token_type": "Bearer", "expires_in": 3600}));
            })
            .await;

        let (flow, _dir) = controller(server.url("/token"));
        let mut expired = Token::new("T1", "Bearer", Some("R".to_string()), None);
        expired.expiry = Some(Utc::now() - ChronoDuration::minutes(5));
        flow.store().save(&expired).await.unwrap();

        let token = flow.authorized_token().await.unwrap();

        refresh_mock.assert_async().await;
        assert_eq!(token.access_token, "T2");
        assert_eq!(token.refresh_token.as_deref(), Some("R"));
        assert_eq!(flow.load_active_token().await.unwrap(), token);
    }

    #[tokio::test]
    async fn test_authorized_token_without_refresh_token() {
        let (flow, _dir) = controller("http://127.0.0.1:9/token".to_string());
        let mut expired = Token::new("T1", "Bearer", None, None);
        expired.expiry = Some(Utc::now() - ChronoDuration::minutes(5));
        flow.store().save(&expired).await.unwrap();

        assert!(matches!(flow.authorized_token().await, Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_authorized_token_passes_through_valid_credential() {
        let (flow, _dir) = controller("http://127.0.0.1:9/token".to_string());
        let valid = Token::new("T", "Bearer", None, Some(Duration::from_secs(600)));
        flow.store().save(&valid).await.unwrap();

        assert_eq!(flow.authorized_token().await.unwrap(), valid);
    }
}
