use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use gs_sdk::Hub;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler;

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub hub: Hub,
    pub delivery_timeout: Duration,
}

/// Build the axum router with all GifStream endpoints.
pub fn build_router(hub: Hub, config: &ServerConfig) -> Router {
    let state = AppState {
        hub,
        delivery_timeout: config.broadcast.delivery_timeout(),
    };
    Router::new()
        .route("/", get(handler::index_handler))
        .route("/upload", post(handler::upload_handler))
        .route("/img", get(handler::image_handler))
        .route("/stream", get(handler::stream_handler))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
