// HTTP, SSE and WebSocket routes

mod http;
mod sse;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::broadcast::StreamHub;
use crate::config::AppConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) hub: Arc<StreamHub>,
    pub(crate) config: AppConfig,
}

pub fn app(hub: Arc<StreamHub>, config: AppConfig) -> Router {
    let state = AppState { hub, config };
    Router::new()
        .route("/", get(|| async { "container-pulse" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/snapshot", get(http::snapshot_handler)) // GET /api/snapshot
        .route("/api/stream", get(sse::sse_stats)) // SSE /api/stream
        .route("/ws/stats", get(ws::ws_stats)) // WS /ws/stats
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
