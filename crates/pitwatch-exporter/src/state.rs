//! Shared state for the HTTP handlers.

use std::sync::Arc;

use pitwatch_core::ServerState;

/// What every handler can reach: the monitor's stores and the snapshot
/// source used to refresh them on scrape.
#[derive(Debug)]
pub struct AppState<S> {
    /// The monitor's stores.
    pub server: Arc<ServerState>,
    /// Source refreshed before each metrics render.
    pub source: Arc<S>,
}

impl<S> AppState<S> {
    /// Bundle the stores with a snapshot source.
    pub const fn new(server: Arc<ServerState>, source: Arc<S>) -> Self {
        Self { server, source }
    }
}
