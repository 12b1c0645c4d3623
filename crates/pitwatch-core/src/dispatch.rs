//! Event dispatcher: applies decoded events to the stores.
//!
//! Each [`Event`] variant has exactly one rule. A rule takes the locks it
//! needs for the in-memory update, releases them, and only then builds the
//! [`Notice`] from owned values.

use std::sync::Arc;

use pitwatch_protocol::{DecodeError, Event, decode_frame};
use tracing::debug;

use crate::notice::{Notice, PlayerCount, driver_label};
use crate::poll::PollTrigger;
use crate::roster::Participant;
use crate::session_type::SessionType;
use crate::state::ServerState;

/// Routes decoded events to the [`ServerState`] stores.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    state: Arc<ServerState>,
    trigger: PollTrigger,
}

impl Dispatcher {
    /// Create a dispatcher writing into `state`. New sessions raise
    /// `trigger`.
    pub const fn new(state: Arc<ServerState>, trigger: PollTrigger) -> Self {
        Self { state, trigger }
    }

    /// The state this dispatcher writes into.
    pub const fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Decode one datagram and apply it.
    ///
    /// A frame that fails to decode changes nothing.
    pub async fn handle_datagram(&self, datagram: &[u8]) -> Result<Option<Notice>, DecodeError> {
        let event = decode_frame(datagram)?;
        Ok(self.apply(event).await)
    }

    /// Apply one event and return the notice describing it, if the event
    /// kind has one.
    pub async fn apply(&self, event: Event) -> Option<Notice> {
        let state = &self.state;

        match event {
            Event::Error => Some(Notice::ServerError),

            Event::Chat(chat) => {
                let name = state.roster.driver_name(chat.slot).await;
                Some(Notice::Chat {
                    driver: driver_label(name.as_deref(), chat.slot),
                    message: chat.message,
                })
            }

            Event::NewSession(session) => {
                state
                    .context
                    .begin_session(&session.server_name, &session.track, &session.track_config)
                    .await;
                self.trigger.request();
                let track = state.context.session().await.track;
                Some(Notice::NewSession {
                    server_name: session.server_name,
                    track,
                    session_number: u16::from(session.current_session_index).saturating_add(1),
                    session_count: session.session_count,
                })
            }

            Event::NewConnection(conn) => {
                let connected = state
                    .roster
                    .connect(conn.slot, &conn.driver_name, &conn.driver_guid)
                    .await;
                state.counters.record_connection();
                let max = state.context.max_clients().await;
                Some(Notice::Connected {
                    driver: driver_label(Some(&conn.driver_name), conn.slot),
                    slot: conn.slot,
                    players: PlayerCount { connected, max },
                })
            }

            Event::ConnectionClosed(closed) => {
                let connected = state.roster.disconnect(closed.slot).await;
                state.counters.record_disconnection();
                let name = if closed.driver_name.is_empty() {
                    state.roster.driver_name(closed.slot).await
                } else {
                    Some(closed.driver_name)
                };
                let max = state.context.max_clients().await;
                Some(Notice::Disconnected {
                    driver: driver_label(name.as_deref(), closed.slot),
                    slot: closed.slot,
                    players: PlayerCount { connected, max },
                })
            }

            Event::LapCompleted(lap) => {
                state.counters.record_lap();
                let name = state.roster.driver_name(lap.slot).await;
                Some(Notice::Lap {
                    driver: driver_label(name.as_deref(), lap.slot),
                    lap_time_ms: lap.lap_time_ms,
                    cuts: lap.cuts,
                })
            }

            Event::SlotInfo(info) => {
                debug!(slot = info.slot, connected = info.connected, "Slot info");
                state.roster.replace(Participant::from(info)).await;
                None
            }

            Event::SessionInfo(info) => {
                let session_type = SessionType::from_ordinal(i64::from(info.session_type));
                state
                    .context
                    .apply_session_info(&info.server_name, session_type)
                    .await;
                Some(Notice::SessionInfo {
                    server_name: info.server_name,
                    session_type,
                })
            }

            Event::ClientEvent(client) => {
                state.counters.record_collision();
                let name = state.roster.driver_name(client.slot).await;
                Some(Notice::Collision {
                    driver: driver_label(name.as_deref(), client.slot),
                    kind: client.kind,
                })
            }

            Event::Version { version } => Some(Notice::ProtocolVersion { version }),

            Event::Unknown { kind } => {
                debug!(kind, "Ignoring feed event without a handler");
                None
            }
        }
    }
}
