//! # OAuth2 Authentication Module
//!
//! Authorization-code flow for the calendar provider.
//!
//! ## Structure:
//! - `config.rs`: client configuration loaded from the client-secret file
//! - `client.rs`: OAuth2 HTTP client (authorization URL, code and refresh grants)
//! - `flow.rs`: flow controller (pending state, callback, active token)
//! - `token.rs` / `token_store.rs`: the single persisted credential
//! - `handlers.rs`: HTTP handlers (login, callback, status)

pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod handlers;
pub mod token;
pub mod token_store;

pub use client::OAuth2Client;
pub use config::ClientConfiguration;
pub use error::{AuthError, AuthResult, StoreError};
pub use flow::{FlowStatus, OAuthFlowController};
pub use handlers::{auth_status, handle_oauth_callback, start_oauth_flow};
pub use token::Token;
pub use token_store::CredentialStore;
