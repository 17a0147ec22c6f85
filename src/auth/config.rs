//! OAuth2 Client Configuration
//!
//! Loaded once at startup from the client-secret file downloaded from the
//! Google Cloud Console. Accepts the `web` and `installed` layouts as well as
//! a flat document with `client_id`/`client_secret` at the root.

use std::path::Path;

use serde::Deserialize;

use super::error::{AuthError, AuthResult};
use crate::config::OAuthSettings;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Clone)]
pub struct ClientConfiguration {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    web: Option<ClientSecretSection>,
    installed: Option<ClientSecretSection>,
    #[serde(flatten)]
    flat: ClientSecretSection,
}

#[derive(Debug, Default, Deserialize)]
struct ClientSecretSection {
    client_id: Option<String>,
    client_secret: Option<String>,
    auth_uri: Option<String>,
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientConfiguration {
    pub fn from_file(path: impl AsRef<Path>, settings: &OAuthSettings) -> AuthResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuthError::config_error(format!(
                "unable to read client secret file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&content, settings)
    }

    pub fn from_json(json: &str, settings: &OAuthSettings) -> AuthResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(json).map_err(|e| {
            AuthError::config_error(format!("unable to parse client secret file: {}", e))
        })?;

        let section = file.web.or(file.installed).unwrap_or(file.flat);

        let client_id = non_empty(section.client_id)
            .ok_or_else(|| AuthError::config_error("client secret file has no client_id"))?;
        let client_secret = non_empty(section.client_secret)
            .ok_or_else(|| AuthError::config_error("client secret file has no client_secret"))?;

        let redirect_uri = non_empty(settings.redirect_uri.clone())
            .or_else(|| section.redirect_uris.into_iter().find(|u| !u.is_empty()))
            .ok_or_else(|| AuthError::config_error("no redirect URI configured"))?;

        let scopes = settings.scopes();
        if scopes.is_empty() {
            return Err(AuthError::config_error("no OAuth scope configured"));
        }

        Ok(Self {
            client_id,
            client_secret,
            auth_url: non_empty(section.auth_uri).unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            token_url: non_empty(section.token_uri).unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
            redirect_uri,
            scopes,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
