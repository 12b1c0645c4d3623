//! Exporter HTTP listener.
//!
//! Binding is split from serving so startup can fail fast on a taken port
//! before the feed and poll tasks are spawned.

use std::net::SocketAddr;
use std::sync::Arc;

use pitwatch_core::SnapshotSource;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Bind the exporter's TCP listener.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is unavailable.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("{addr}: {e}")))
}

/// Serve the exporter routes on `listener` until the process ends.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] on a fatal I/O error.
pub async fn serve<S>(listener: TcpListener, state: Arc<AppState<S>>) -> Result<(), ServerError>
where
    S: SnapshotSource + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Exporter listening");
    }

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))
}

/// Errors raised by the exporter listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("bind error: {0}")]
    Bind(String),

    /// The listener failed while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
