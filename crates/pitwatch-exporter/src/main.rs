//! Entry point for the pitwatch exporter.
//!
//! Connects to the dedicated server's plugin feed, starts the poll loop and
//! serves metrics until interrupted.
//!
//! ```text
//! UDP feed ---> feed task ---> Dispatcher ---> ServerState <--- poll task
//!                                                   |
//!                                          HTTP (/metrics, /api/state)
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use pitwatch_core::{
    Dispatcher, FeedLink, HttpSnapshotSource, PollOrchestrator, PollTrigger, ServerState,
};
use pitwatch_exporter::config::ExporterConfig;
use pitwatch_exporter::server;
use pitwatch_exporter::state::AppState;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the feed socket cannot be
/// set up, or the HTTP listener fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("pitwatch-exporter starting");

    let config = ExporterConfig::from_env()?;
    info!(
        server_host = config.server_host,
        udp_port = config.udp_port,
        http_port = config.http_port,
        exporter_port = config.exporter_port,
        poll_interval_secs = config.poll_interval.as_secs(),
        slot_count = config.slot_count,
        "configuration loaded"
    );

    let listener = server::bind(SocketAddr::from(([0, 0, 0, 0], config.exporter_port))).await?;

    let state = Arc::new(ServerState::new());
    let source = Arc::new(HttpSnapshotSource::new(
        &config.server_host,
        config.http_port,
        config.snapshot_timeout,
    )?);

    let link = Arc::new(FeedLink::connect(&config.server_host, config.udp_port).await?);
    info!(remote = %link.remote(), "Feed socket bound");
    if let Err(e) = link.handshake().await {
        warn!(error = %e, "Feed handshake failed, waiting for server traffic");
    }

    let trigger = PollTrigger::new();
    let dispatcher = Dispatcher::new(Arc::clone(&state), trigger.clone());
    let feed = tokio::spawn(Arc::clone(&link).run(dispatcher));

    let orchestrator = PollOrchestrator::new(
        Arc::clone(&state),
        Arc::clone(&source),
        link,
        trigger,
        config.poll_config(),
    );
    let poll = tokio::spawn(orchestrator.run());

    let app = Arc::new(AppState::new(state, source));

    tokio::select! {
        result = server::serve(listener, app) => result?,
        result = feed => error!(?result, "Feed task exited"),
        result = poll => error!(?result, "Poll task exited"),
        _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
    }

    info!("pitwatch-exporter stopped");
    Ok(())
}
