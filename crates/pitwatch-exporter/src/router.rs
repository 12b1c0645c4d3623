//! Axum router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use pitwatch_core::SnapshotSource;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the exporter router.
///
/// - `GET /` -- HTML status page
/// - `GET /metrics` -- Prometheus text exposition
/// - `GET /health` -- liveness probe
/// - `GET /api/state` -- JSON state view
pub fn build_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: SnapshotSource + 'static,
{
    Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/metrics", get(handlers::metrics::<S>))
        .route("/health", get(handlers::health))
        .route("/api/state", get(handlers::api_state::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
