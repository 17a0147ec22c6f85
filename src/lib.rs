// Tutor relay library
// Exposes the modules for the binary and for tests

pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

// AppState is defined here so handlers and tests share it
pub struct AppState {
    pub settings: config::Settings,
    pub oauth: auth::OAuthFlowController,
    pub text_generator: Arc<dyn services::TextGenerator>,
    pub video_searcher: Arc<dyn services::VideoSearcher>,
    pub calendar: Arc<dyn services::CalendarEvents>,
}
