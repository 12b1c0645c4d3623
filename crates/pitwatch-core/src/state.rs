//! The shared [`ServerState`] and the read views built from it.

use serde::Serialize;
use tracing::warn;

use crate::context::{ContextStore, SessionContext, SnapshotRecord};
use crate::counters::{CounterBank, LifetimeCounters};
use crate::error::FetchError;
use crate::roster::{Participant, Roster};
use crate::session_type::SessionType;
use crate::snapshot::SnapshotSource;

/// Every store the monitor keeps, owned in one place.
///
/// Wrap it in an `Arc` and hand clones to the feed task, the poll task and
/// the HTTP handlers.
#[derive(Debug, Default)]
pub struct ServerState {
    /// Slot records.
    pub roster: Roster,
    /// Lifetime event counters.
    pub counters: CounterBank,
    /// Session context and last good snapshot.
    pub context: ContextStore,
}

/// Full point-in-time view, served as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    /// Session context from the feed.
    pub session: SessionContext,
    /// Counter values.
    pub counters: LifetimeCounters,
    /// Number of connected slots.
    pub connected: usize,
    /// Every known slot, ordered by slot id.
    pub participants: Vec<Participant>,
    /// Latest snapshot, if any.
    pub snapshot: Option<SnapshotRecord>,
}

/// Condensed status used for the poll cycle log line and the index page.
///
/// Snapshot values win over feed values when a snapshot exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerSummary {
    /// Server display name.
    pub server_name: String,
    /// Track description.
    pub track: String,
    /// Session type, when known.
    pub session: Option<SessionType>,
    /// Player capacity, when known.
    pub max_players: Option<u32>,
    /// Connected slots.
    pub connected: Vec<Participant>,
}

impl ServerState {
    /// Create a state with empty stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a snapshot from `source` and store it.
    ///
    /// On failure the previous snapshot is kept and the error is returned
    /// after being logged.
    pub async fn refresh_snapshot<S: SnapshotSource>(&self, source: &S) -> Result<(), FetchError> {
        match source.fetch().await {
            Ok(snapshot) => {
                self.context.store_snapshot(snapshot).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Snapshot refresh failed, keeping last good snapshot");
                Err(e)
            }
        }
    }

    /// Assemble a [`StateView`].
    pub async fn view(&self) -> StateView {
        let participants = self.roster.participants().await;
        let connected = participants.iter().filter(|p| p.connected).count();
        StateView {
            session: self.context.session().await,
            counters: self.counters.snapshot(),
            connected,
            participants,
            snapshot: self.context.snapshot().await,
        }
    }

    /// Assemble a [`ServerSummary`].
    pub async fn summary(&self) -> ServerSummary {
        let session = self.context.session().await;
        let connected = self.roster.connected().await;

        match self.context.snapshot().await {
            Some(record) => {
                let snap = record.snapshot;
                let track = crate::context::compose_track(&snap.track, &snap.track_config);
                ServerSummary {
                    server_name: snap.name,
                    track,
                    session: Some(SessionType::from_ordinal(i64::from(snap.session))),
                    max_players: Some(snap.max_clients).filter(|max| *max > 0),
                    connected,
                }
            }
            None => ServerSummary {
                server_name: session.server_name,
                track: session.track,
                session: session.session_type,
                max_players: None,
                connected,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::snapshot::ServerSnapshot;

    struct FixedSource(Option<ServerSnapshot>);

    impl SnapshotSource for FixedSource {
        async fn fetch(&self) -> Result<ServerSnapshot, FetchError> {
            self.0.clone().ok_or(FetchError::Status(503))
        }
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let state = ServerState::new();
        let good = FixedSource(Some(ServerSnapshot {
            name: "Good".to_owned(),
            ..ServerSnapshot::default()
        }));

        state.refresh_snapshot(&good).await.unwrap();
        let first = state.context.snapshot().await.unwrap();

        let err = state.refresh_snapshot(&FixedSource(None)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
        assert_eq!(state.context.snapshot().await.unwrap(), first);
    }

    #[tokio::test]
    async fn summary_falls_back_to_feed_context() {
        let state = ServerState::new();
        state.context.begin_session("Feed Name", "monza", "").await;
        state
            .context
            .apply_session_info("Feed Name", SessionType::Practice)
            .await;
        state.roster.connect(1, "Alice", "g1").await;

        let summary = state.summary().await;
        assert_eq!(summary.server_name, "Feed Name");
        assert_eq!(summary.track, "monza");
        assert_eq!(summary.session, Some(SessionType::Practice));
        assert_eq!(summary.max_players, None);
        assert_eq!(summary.connected.len(), 1);
    }

    #[tokio::test]
    async fn summary_prefers_snapshot() {
        let state = ServerState::new();
        state.context.begin_session("Feed Name", "monza", "").await;
        state
            .context
            .store_snapshot(ServerSnapshot {
                name: "Snapshot Name".to_owned(),
                track: "spa".to_owned(),
                track_config: "gp".to_owned(),
                session: 3,
                max_clients: 16,
                ..ServerSnapshot::default()
            })
            .await;

        let summary = state.summary().await;
        assert_eq!(summary.server_name, "Snapshot Name");
        assert_eq!(summary.track, "spa (gp)");
        assert_eq!(summary.session, Some(SessionType::Race));
        assert_eq!(summary.max_players, Some(16));
    }

    #[tokio::test]
    async fn view_counts_connected() {
        let state = ServerState::new();
        state.roster.connect(0, "A", "a").await;
        state.roster.connect(1, "B", "b").await;
        state.roster.disconnect(0).await;
        state.counters.record_connection();

        let view = state.view().await;
        assert_eq!(view.connected, 1);
        assert_eq!(view.participants.len(), 2);
        assert_eq!(view.counters.connections, 1);
        assert!(view.snapshot.is_none());
    }
}
