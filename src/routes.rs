use axum::{
    routing::{any, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::{auth_status, handle_oauth_callback, start_oauth_flow};
use crate::handlers::{create_calendar_event, handle_tutor, health_check, search_videos};
use crate::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let frontend = ServeDir::new(&state.settings.server.static_dir);

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/status", get(auth_status))
        .route("/login/:provider", get(start_oauth_flow))
        .route("/callback/:provider", get(handle_oauth_callback))
        .route("/api/tutor", any(handle_tutor))
        .route("/api/search", get(search_videos))
        // Path used by the bundled frontend
        .route("/api/youtube", get(search_videos))
        .route("/api/calendar/event", post(create_calendar_event))
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
