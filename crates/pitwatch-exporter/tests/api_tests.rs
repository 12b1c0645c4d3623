//! Integration tests for the exporter endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` with an
//! in-memory snapshot source, so no TCP listener or dedicated server is
//! needed.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pitwatch_core::{FetchError, ServerSnapshot, ServerState, SnapshotSource};
use pitwatch_exporter::router::build_router;
use pitwatch_exporter::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// Serves whatever snapshot is currently loaded, or fails when empty.
#[derive(Default)]
struct ScriptedSource {
    next: Mutex<Option<ServerSnapshot>>,
}

impl ScriptedSource {
    fn load(&self, snapshot: Option<ServerSnapshot>) {
        *self.next.lock().unwrap() = snapshot;
    }
}

impl SnapshotSource for ScriptedSource {
    async fn fetch(&self) -> Result<ServerSnapshot, FetchError> {
        let next = self.next.lock().unwrap().clone();
        next.ok_or(FetchError::Status(502))
    }
}

fn setup() -> (Arc<AppState<ScriptedSource>>, Arc<ScriptedSource>) {
    let source = Arc::new(ScriptedSource::default());
    let app = Arc::new(AppState::new(Arc::new(ServerState::new()), Arc::clone(&source)));
    (app, source)
}

fn sunday_cup() -> ServerSnapshot {
    ServerSnapshot {
        name: "Sunday Cup".to_owned(),
        track: "spa".to_owned(),
        powered_by: "AssettoServer".to_owned(),
        clients: 4,
        max_clients: 20,
        session: 2,
        ..ServerSnapshot::default()
    }
}

async fn get(app: &Arc<AppState<ScriptedSource>>, uri: &str) -> (StatusCode, String, Option<String>) {
    let response = build_router(Arc::clone(app))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _) = setup();
    let (status, body, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn metrics_without_any_snapshot_render_sentinel() {
    let (app, _) = setup();
    app.server.counters.record_lap();

    let (status, body, content_type) = get(&app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; version=0.0.4"));
    let lines: Vec<&str> = body.lines().collect();
    assert!(lines.contains(&"ac_server_up 0"));
    assert!(lines.contains(&"ac_server_players 0"));
    assert!(lines.contains(&"ac_server_max_players 0"));
    assert!(lines.contains(&"ac_server_lap_completed_total 1"));
}

#[tokio::test]
async fn metrics_refresh_then_keep_last_good_snapshot() {
    let (app, source) = setup();
    source.load(Some(sunday_cup()));

    let (_, first, _) = get(&app, "/metrics").await;
    assert!(first.contains(r#"server_name="Sunday Cup""#));
    assert!(first.lines().any(|l| l.starts_with("ac_server_players{") && l.ends_with(" 4")));

    // The server stops answering: the cached snapshot is still rendered.
    source.load(None);
    let (status, second, _) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(second.contains(r#"server_name="Sunday Cup""#));
    assert!(second.lines().any(|l| l.starts_with("ac_server_up{") && l.ends_with(" 1")));
    assert!(!second.lines().any(|l| l == "ac_server_up 0"));
}

#[tokio::test]
async fn api_state_reports_stores() {
    let (app, source) = setup();
    source.load(Some(sunday_cup()));
    app.server.refresh_snapshot(&*source).await.unwrap();
    app.server.roster.connect(3, "Alice", "g1").await;
    app.server.counters.record_connection();

    let (status, body, _) = get(&app, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["connected"], 1);
    assert_eq!(json["counters"]["connections"], 1);
    assert_eq!(json["participants"][0]["driver_name"], "Alice");
    assert_eq!(json["snapshot"]["snapshot"]["name"], "Sunday Cup");
    assert!(json["snapshot"]["fetched_at"].is_string());
}

#[tokio::test]
async fn index_page_shows_summary() {
    let (app, source) = setup();
    source.load(Some(sunday_cup()));
    app.server.refresh_snapshot(&*source).await.unwrap();
    app.server.roster.connect(1, "<Bob>", "g2").await;

    let (status, body, _) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Sunday Cup"));
    assert!(body.contains("Qualifying"));
    assert!(body.contains("1 / 20"));
    assert!(body.contains("&lt;Bob&gt;"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _) = setup();
    let (status, _, _) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
