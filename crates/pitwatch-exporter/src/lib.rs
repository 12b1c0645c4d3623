//! Prometheus exporter and HTTP surface for the pitwatch monitor.
//!
//! Serves the state kept by [`pitwatch_core`] over HTTP:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/metrics` | Prometheus text exposition, refreshed per scrape |
//! | `GET` | `/health` | Liveness probe |
//! | `GET` | `/api/state` | JSON view of every store |
//!
//! The binary in `main.rs` wires the feed link, the poll orchestrator and
//! this server together from [`config::ExporterConfig`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod server;
pub mod state;
