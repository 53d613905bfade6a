// GET handlers: version, current snapshot

use axum::{extract::State, http::header, response::IntoResponse};

use super::AppState;
use crate::broadcast::snapshot_payload;

/// GET /version: package name and version baked in at build time.
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/snapshot: the cached snapshot; shares the TTL window with the streams.
pub(super) async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.hub.cache().get_snapshot().await;
    (
        [(header::CONTENT_TYPE, "application/json")],
        snapshot_payload(&snapshot),
    )
}
