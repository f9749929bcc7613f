use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::logging,
    routes::{cases, drafts, health, messages, threads},
    state::AppState,
};

/// Build the full HTTP router with middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Threads
        .route("/thread", post(threads::create_thread))
        .route("/threads", get(threads::list_threads))
        .route("/thread/:thread_id", get(threads::get_thread))
        // Messages
        .route("/thread/:thread_id/message", post(messages::post_message))
        .route("/thread/:thread_id/messages", get(messages::list_messages))
        // Drafts
        .route("/thread/:thread_id/draft", get(drafts::get_draft));

    if state.engine.cases().is_some() {
        routes = routes
            .route("/cases", get(cases::list_cases))
            .route("/cases/follow-ups", get(cases::due_follow_ups))
            .route("/cases/:case_id", get(cases::get_case))
            .route("/cases/:case_id/resolution", post(cases::submit_resolution))
            .route("/cases/:case_id/follow-up", post(cases::mark_follow_up_sent));
    }

    routes
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::permissive();
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors.origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
