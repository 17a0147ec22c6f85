/// Tutor relay server
///
/// - `/api/tutor` forwards prompts to Gemini
/// - `/api/search` (and `/api/youtube`) forwards searches to YouTube
/// - `/api/calendar/event` creates Google Calendar events with the token
///   obtained through `/login/google` and `/callback/google`
/// - everything else is served from the static frontend directory

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tutor_relay::auth::{ClientConfiguration, CredentialStore, OAuth2Client, OAuthFlowController};
use tutor_relay::config::{ApiKeys, Settings};
use tutor_relay::routes::build_router;
use tutor_relay::services::{GeminiClient, GoogleCalendarClient, YouTubeClient};
use tutor_relay::utils::logging::*;
use tutor_relay::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; in production variables come from the environment
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        log_info("✅ .env file loaded");
    }

    let settings = Settings::new().context("failed to load settings")?;
    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    let api_keys = ApiKeys::from_env().map_err(anyhow::Error::msg)?;

    let client_config =
        ClientConfiguration::from_file(&settings.oauth.client_secret_file, &settings.oauth)
            .context("failed to load OAuth client configuration")?;
    log_info(&format!(
        "🔐 OAuth2 client loaded from {} (redirect {})",
        settings.oauth.client_secret_file, client_config.redirect_uri
    ));

    let oauth_client = OAuth2Client::new(
        &client_config,
        Duration::from_secs(settings.oauth.exchange_timeout_secs),
    )?;
    let oauth = OAuthFlowController::new(oauth_client, CredentialStore::new(&settings.oauth.token_file));

    let state = Arc::new(AppState {
        text_generator: Arc::new(GeminiClient::new(&settings.generation, api_keys.gemini)?),
        video_searcher: Arc::new(YouTubeClient::new(&settings.search, api_keys.youtube)?),
        calendar: Arc::new(GoogleCalendarClient::new(&settings.calendar)?),
        oauth,
        settings,
    });

    let addr = format!("{}:{}", state.settings.server.host, state.settings.server.port);
    log_server_startup(state.settings.server.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    log_server_ready(&addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("failed to install Ctrl+C handler: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("failed to install SIGTERM handler: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
