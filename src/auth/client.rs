//! OAuth2 HTTP Client
//!
//! Thin wrapper around the `oauth2` crate's basic client: builds the
//! authorization URL and performs the code and refresh-token grants against
//! the provider's token endpoint.

use std::time::Duration;

use oauth2::basic::{BasicClient, BasicTokenResponse, BasicTokenType};
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl,
    RefreshToken, RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use url::Url;

use super::config::ClientConfiguration;
use super::error::{AuthError, AuthResult};
use super::token::Token;
use crate::utils::logging::*;
use crate::utils::redact;

pub struct OAuth2Client {
    client: BasicClient,
    scopes: Vec<String>,
    exchange_timeout: Duration,
}

impl OAuth2Client {
    pub fn new(config: &ClientConfiguration, exchange_timeout: Duration) -> AuthResult<Self> {
        let auth_url = AuthUrl::new(config.auth_url.clone())
            .map_err(|e| AuthError::config_error(format!("invalid authorization URL: {}", e)))?;
        let token_url = TokenUrl::new(config.token_url.clone())
            .map_err(|e| AuthError::config_error(format!("invalid token URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| AuthError::config_error(format!("invalid redirect URI: {}", e)))?;

        let client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(redirect_url);

        Ok(Self {
            client,
            scopes: config.scopes.clone(),
            exchange_timeout,
        })
    }

    /// Authorization URL carrying the client id, scopes, redirect URI,
    /// offline access and the given anti-forgery state.
    pub fn authorization_url(&self, state: &str) -> Url {
        let state = state.to_string();
        let (url, _) = self
            .client
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .url();

        url
    }

    /// Authorization code grant
    pub async fn exchange_code(&self, code: &str) -> AuthResult<Token> {
        log_info(&format!("🔐 [OAuth2] Exchanging authorization code {}", redact(code, 6)));

        let request = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(async_http_client);

        let response = tokio::time::timeout(self.exchange_timeout, request)
            .await
            .map_err(|_| {
                AuthError::exchange_failure(format!(
                    "token endpoint did not answer within {}s",
                    self.exchange_timeout.as_secs()
                ))
            })?
            .map_err(describe_token_error)?;

        let token = token_from_response(&response, None);
        log_info(&format!("✅ [OAuth2] Access token obtained: {}", redact(&token.access_token, 8)));

        Ok(token)
    }

    /// Refresh token grant. Providers usually omit the refresh token in the
    /// response, in which case the one we sent is kept.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<Token> {
        log_info("🔄 [OAuth2] Refreshing expired access token");

        let refresh = RefreshToken::new(refresh_token.to_string());
        let request = self
            .client
            .exchange_refresh_token(&refresh)
            .request_async(async_http_client);

        let response = tokio::time::timeout(self.exchange_timeout, request)
            .await
            .map_err(|_| AuthError::exchange_failure("token refresh timed out"))?
            .map_err(describe_token_error)?;

        Ok(token_from_response(&response, Some(refresh_token)))
    }
}

fn token_from_response(response: &BasicTokenResponse, previous_refresh: Option<&str>) -> Token {
    let refresh_token = response
        .refresh_token()
        .map(|r| r.secret().clone())
        .or_else(|| previous_refresh.map(str::to_string));

    Token::new(
        response.access_token().secret().clone(),
        token_type_name(response.token_type()),
        refresh_token,
        response.expires_in(),
    )
}

fn token_type_name(token_type: &BasicTokenType) -> String {
    match token_type {
        BasicTokenType::Extension(name) => name.clone(),
        BasicTokenType::Mac => "MAC".to_string(),
        _ => "Bearer".to_string(),
    }
}

fn describe_token_error<RE, T>(err: RequestTokenError<RE, T>) -> AuthError
where
    RE: std::error::Error + 'static,
    T: oauth2::ErrorResponse + 'static,
{
    let detail = match &err {
        RequestTokenError::ServerResponse(response) => {
            format!("provider rejected the request: {:?}", response)
        }
        RequestTokenError::Request(e) => format!("request to token endpoint failed: {}", e),
        RequestTokenError::Parse(e, _) => format!("unparsable token response: {}", e),
        RequestTokenError::Other(msg) => msg.clone(),
    };

    log_error(&format!("❌ [OAuth2] {}", detail));
    AuthError::ExchangeFailure(detail)
}
