//! Endpoint handlers.
//!
//! Handlers are generic over the [`SnapshotSource`] so tests can serve the
//! router against an in-memory source.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use pitwatch_core::{SnapshotSource, StateView};
use tracing::debug;

use crate::error::ExporterError;
use crate::metrics::{self, CONTENT_TYPE};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /metrics
// ---------------------------------------------------------------------------

/// Refresh the snapshot, then render every metric.
///
/// A failed refresh still renders, from the last good snapshot if there is
/// one and from the down sentinel otherwise.
pub async fn metrics<S: SnapshotSource>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ExporterError> {
    if state.server.refresh_snapshot(&*state.source).await.is_err() {
        debug!("Rendering metrics from last good snapshot");
    }

    let record = state.server.context.snapshot().await;
    let counters = state.server.counters.snapshot();
    let body = metrics::render(record.as_ref().map(|r| &r.snapshot), &counters)?;

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health() -> &'static str {
    "OK"
}

// ---------------------------------------------------------------------------
// GET /api/state
// ---------------------------------------------------------------------------

/// Every store as JSON.
pub async fn api_state<S: SnapshotSource>(State(state): State<Arc<AppState<S>>>) -> Json<StateView> {
    Json(state.server.view().await)
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Minimal HTML status page.
pub async fn index<S: SnapshotSource>(State(state): State<Arc<AppState<S>>>) -> Html<String> {
    let summary = state.server.summary().await;
    let counters = state.server.counters.snapshot();
    let fetched = state
        .server
        .context
        .snapshot()
        .await
        .map_or_else(|| "never".to_owned(), |r| r.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string());

    let session = summary
        .session
        .map_or_else(|| "Unknown".to_owned(), |s| s.to_string());
    let players = summary.max_players.map_or_else(
        || summary.connected.len().to_string(),
        |max| format!("{} / {max}", summary.connected.len()),
    );

    let mut drivers = String::new();
    for p in &summary.connected {
        let _ = writeln!(
            drivers,
            "        <li>#{} {} <span class=\"dim\">{}</span></li>",
            p.slot,
            escape(&p.driver_name),
            escape(&p.model)
        );
    }
    if drivers.is_empty() {
        drivers.push_str("        <li class=\"dim\">No players connected</li>\n");
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>pitwatch</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .dim {{ color: #8b949e; }}
        td {{ padding: 0.2rem 1rem 0.2rem 0; }}
        a {{ color: #58a6ff; }}
    </style>
</head>
<body>
    <h1>{server}</h1>
    <p class="dim">Snapshot fetched: {fetched}</p>
    <table>
        <tr><td>Track</td><td>{track}</td></tr>
        <tr><td>Session</td><td>{session}</td></tr>
        <tr><td>Players</td><td>{players}</td></tr>
        <tr><td>Laps</td><td>{laps}</td></tr>
        <tr><td>Collisions</td><td>{collisions}</td></tr>
        <tr><td>Connections</td><td>{connections}</td></tr>
        <tr><td>Disconnections</td><td>{disconnections}</td></tr>
    </table>
    <h2>Drivers</h2>
    <ul>
{drivers}    </ul>
    <p><a href="/metrics">/metrics</a> | <a href="/api/state">/api/state</a> | <a href="/health">/health</a></p>
</body>
</html>"#,
        server = escape(&summary.server_name),
        track = escape(&summary.track),
        laps = counters.laps,
        collisions = counters.collisions,
        connections = counters.connections,
        disconnections = counters.disconnections,
    ))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
