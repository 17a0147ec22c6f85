use thiserror::Error;

/// Credential store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no stored credential")]
    NotFound,

    #[error("stored credential is corrupt: {0}")]
    Corrupt(String),

    #[error("credential file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// OAuth2 authorization-code flow failures
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("OAuth state does not match the pending authorization")]
    StateMismatch,

    #[error("authorization code exchange failed: {0}")]
    ExchangeFailure(String),

    #[error("no usable credential; authorization required")]
    NotAuthenticated,

    #[error("credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid OAuth configuration: {0}")]
    Config(String),
}

impl AuthError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn exchange_failure(msg: impl Into<String>) -> Self {
        Self::ExchangeFailure(msg.into())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
