//! Session context and the last good info snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::session_type::SessionType;
use crate::snapshot::ServerSnapshot;

/// What the feed last said about the running session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Server display name.
    pub server_name: String,
    /// Track, with the layout in parentheses when the track has one.
    pub track: String,
    /// Current session type, once a session-info frame has been seen.
    pub session_type: Option<SessionType>,
}

/// A snapshot together with the instant it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// The parsed document.
    pub snapshot: ServerSnapshot,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
}

/// Holder for the [`SessionContext`] and the latest [`SnapshotRecord`].
///
/// The two halves have separate locks: the feed writes the context while
/// the poll task writes the snapshot.
#[derive(Debug, Default)]
pub struct ContextStore {
    session: RwLock<SessionContext>,
    snapshot: RwLock<Option<SnapshotRecord>>,
}

impl ContextStore {
    /// Create an empty store with no snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the name and track announced by a new session.
    pub async fn begin_session(&self, server_name: &str, track: &str, track_config: &str) {
        let mut session = self.session.write().await;
        server_name.clone_into(&mut session.server_name);
        session.track = compose_track(track, track_config);
    }

    /// Record the name and session type from a session-info frame.
    pub async fn apply_session_info(&self, server_name: &str, session_type: SessionType) {
        let mut session = self.session.write().await;
        server_name.clone_into(&mut session.server_name);
        session.session_type = Some(session_type);
    }

    /// Copy of the current session context.
    pub async fn session(&self) -> SessionContext {
        self.session.read().await.clone()
    }

    /// Copy of the latest snapshot record, if any fetch has succeeded.
    pub async fn snapshot(&self) -> Option<SnapshotRecord> {
        self.snapshot.read().await.clone()
    }

    /// Replace the stored snapshot, stamping it with the current time.
    pub async fn store_snapshot(&self, snapshot: ServerSnapshot) {
        let record = SnapshotRecord {
            snapshot,
            fetched_at: Utc::now(),
        };
        *self.snapshot.write().await = Some(record);
    }

    /// Player capacity from the snapshot, `None` when unknown or zero.
    pub async fn max_clients(&self) -> Option<u32> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(|r| r.snapshot.max_clients)
            .filter(|max| *max > 0)
    }
}

/// `"track (config)"`, or just `"track"` when the layout is empty.
pub fn compose_track(track: &str, track_config: &str) -> String {
    if track_config.is_empty() {
        track.to_owned()
    } else {
        format!("{track} ({track_config})")
    }
}
