//! Typed events decoded from the plugin feed.
//!
//! [`Event`] is a closed enum with one variant per kind the monitor
//! understands. Kinds the monitor has no use for are kept as
//! [`Event::Unknown`] so the caller can log and skip them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    KIND_CHAT, KIND_CLIENT_EVENT, KIND_CONNECTION_CLOSED, KIND_ERROR, KIND_LAP_COMPLETED,
    KIND_NEW_CONNECTION, KIND_NEW_SESSION, KIND_SESSION_INFO, KIND_SLOT_INFO, KIND_VERSION,
    MIN_CHAT, MIN_CLIENT_EVENT, MIN_CONNECTION_CLOSED, MIN_LAP_COMPLETED, MIN_NEW_CONNECTION,
    MIN_NEW_SESSION, MIN_SESSION_INFO, MIN_SLOT_INFO, MIN_VERSION,
};

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// The kinds of event the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Server-side error report.
    Error,
    /// Driver chat message.
    Chat,
    /// Start of a new session.
    NewSession,
    /// Driver connected.
    NewConnection,
    /// Driver disconnected.
    ConnectionClosed,
    /// Lap completed.
    LapCompleted,
    /// Full slot description.
    SlotInfo,
    /// Session description.
    SessionInfo,
    /// Collision report.
    ClientEvent,
    /// Protocol version announcement.
    Version,
}

impl EventKind {
    /// Map a kind tag to a decodable kind, or `None` for kinds without a
    /// decoder.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            KIND_ERROR => Some(Self::Error),
            KIND_CHAT => Some(Self::Chat),
            KIND_NEW_SESSION => Some(Self::NewSession),
            KIND_NEW_CONNECTION => Some(Self::NewConnection),
            KIND_CONNECTION_CLOSED => Some(Self::ConnectionClosed),
            KIND_LAP_COMPLETED => Some(Self::LapCompleted),
            KIND_SLOT_INFO => Some(Self::SlotInfo),
            KIND_SESSION_INFO => Some(Self::SessionInfo),
            KIND_CLIENT_EVENT => Some(Self::ClientEvent),
            KIND_VERSION => Some(Self::Version),
            _ => None,
        }
    }

    /// The wire tag for this kind.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Error => KIND_ERROR,
            Self::Chat => KIND_CHAT,
            Self::NewSession => KIND_NEW_SESSION,
            Self::NewConnection => KIND_NEW_CONNECTION,
            Self::ConnectionClosed => KIND_CONNECTION_CLOSED,
            Self::LapCompleted => KIND_LAP_COMPLETED,
            Self::SlotInfo => KIND_SLOT_INFO,
            Self::SessionInfo => KIND_SESSION_INFO,
            Self::ClientEvent => KIND_CLIENT_EVENT,
            Self::Version => KIND_VERSION,
        }
    }

    /// Smallest payload (excluding the tag byte) accepted for this kind.
    pub const fn min_payload(self) -> usize {
        match self {
            Self::Error => 0,
            Self::Chat => MIN_CHAT,
            Self::NewSession => MIN_NEW_SESSION,
            Self::NewConnection => MIN_NEW_CONNECTION,
            Self::ConnectionClosed => MIN_CONNECTION_CLOSED,
            Self::LapCompleted => MIN_LAP_COMPLETED,
            Self::SlotInfo => MIN_SLOT_INFO,
            Self::SessionInfo => MIN_SESSION_INFO,
            Self::ClientEvent => MIN_CLIENT_EVENT,
            Self::Version => MIN_VERSION,
        }
    }

    /// Short lowercase name used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Chat => "chat",
            Self::NewSession => "new-session",
            Self::NewConnection => "new-connection",
            Self::ConnectionClosed => "connection-closed",
            Self::LapCompleted => "lap-completed",
            Self::SlotInfo => "slot-info",
            Self::SessionInfo => "session-info",
            Self::ClientEvent => "client-event",
            Self::Version => "protocol-version",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A chat line sent by the driver in `slot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Sender slot.
    pub slot: u8,
    /// Message text.
    pub message: String,
}

/// Announcement of a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    /// Protocol version of the sender.
    pub version: u8,
    /// Index of the announced session.
    pub session_index: u8,
    /// Index of the session currently running.
    pub current_session_index: u8,
    /// Number of sessions in the event.
    pub session_count: u8,
    /// Server display name.
    pub server_name: String,
    /// Track identifier.
    pub track: String,
    /// Track layout, empty when the track has a single layout.
    pub track_config: String,
}

/// A driver joined the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConnection {
    /// Driver display name.
    pub driver_name: String,
    /// Driver unique identifier.
    pub driver_guid: String,
    /// Slot the driver took.
    pub slot: u8,
    /// Numeric vehicle model id.
    pub model_id: u8,
    /// Numeric skin id.
    pub skin_id: u8,
}

/// A driver left the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionClosed {
    /// Driver display name.
    pub driver_name: String,
    /// Slot the driver released.
    pub slot: u8,
}

/// A completed lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapCompleted {
    /// Slot of the driver.
    pub slot: u8,
    /// Lap duration in milliseconds.
    pub lap_time_ms: u32,
    /// Number of track-limit cuts during the lap.
    pub cuts: u8,
}

/// Authoritative description of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    /// Slot identifier.
    pub slot: u8,
    /// Whether a driver currently occupies the slot.
    pub connected: bool,
    /// Vehicle model name.
    pub model: String,
    /// Vehicle skin name.
    pub skin: String,
    /// Driver display name.
    pub driver_name: String,
    /// Driver unique identifier.
    pub driver_guid: String,
}

/// Description of the current session.
///
/// The frame also carries ambient temperature, road temperature, weather
/// graphics and elapsed time as text fields. They are validated by the
/// decoder but not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Protocol version of the sender.
    pub version: u8,
    /// Index of the described session.
    pub session_index: u8,
    /// Index of the session currently running.
    pub current_session_index: u8,
    /// Number of sessions in the event.
    pub session_count: u8,
    /// Server display name.
    pub server_name: String,
    /// Session type ordinal.
    pub session_type: u8,
    /// Session duration in minutes.
    pub duration: u16,
    /// Lap target, zero for timed sessions.
    pub laps: u16,
    /// Wait time before the session starts.
    pub wait_time: u16,
}

/// Sub-type of a [`ClientEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientEventKind {
    /// Contact with the environment (walls, barriers).
    EnvironmentCollision,
    /// Contact with another car.
    CarCollision,
    /// Any other ordinal.
    Other(u8),
}

impl From<u8> for ClientEventKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::EnvironmentCollision,
            1 => Self::CarCollision,
            other => Self::Other(other),
        }
    }
}

impl From<ClientEventKind> for u8 {
    fn from(value: ClientEventKind) -> Self {
        match value {
            ClientEventKind::EnvironmentCollision => 0,
            ClientEventKind::CarCollision => 1,
            ClientEventKind::Other(other) => other,
        }
    }
}

/// A collision reported by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEvent {
    /// Slot of the reporting driver.
    pub slot: u8,
    /// What was hit.
    pub kind: ClientEventKind,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One decoded feed datagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The server reported an error. Carries no payload.
    Error,
    /// Chat message.
    Chat(Chat),
    /// A new session started.
    NewSession(NewSession),
    /// A driver connected.
    NewConnection(NewConnection),
    /// A driver disconnected.
    ConnectionClosed(ConnectionClosed),
    /// A lap was completed.
    LapCompleted(LapCompleted),
    /// Slot description.
    SlotInfo(SlotInfo),
    /// Session description.
    SessionInfo(SessionInfo),
    /// Collision report.
    ClientEvent(ClientEvent),
    /// Protocol version announcement.
    Version {
        /// Protocol version number.
        version: u8,
    },
    /// A kind the decoder does not interpret.
    Unknown {
        /// The raw kind tag.
        kind: u8,
    },
}

impl Event {
    /// The decodable kind of this event, `None` for [`Event::Unknown`].
    pub const fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Error => Some(EventKind::Error),
            Self::Chat(_) => Some(EventKind::Chat),
            Self::NewSession(_) => Some(EventKind::NewSession),
            Self::NewConnection(_) => Some(EventKind::NewConnection),
            Self::ConnectionClosed(_) => Some(EventKind::ConnectionClosed),
            Self::LapCompleted(_) => Some(EventKind::LapCompleted),
            Self::SlotInfo(_) => Some(EventKind::SlotInfo),
            Self::SessionInfo(_) => Some(EventKind::SessionInfo),
            Self::ClientEvent(_) => Some(EventKind::ClientEvent),
            Self::Version { .. } => Some(EventKind::Version),
            Self::Unknown { .. } => None,
        }
    }

    /// The wire tag of this event.
    pub const fn tag(&self) -> u8 {
        match (self.kind(), self) {
            (Some(kind), _) => kind.tag(),
            (None, Self::Unknown { kind }) => *kind,
            (None, _) => KIND_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_round_trip() {
        for tag in 0..=u8::MAX {
            if let Some(kind) = EventKind::from_tag(tag) {
                assert_eq!(kind.tag(), tag);
            }
        }
    }

    #[test]
    fn undecoded_kinds_have_no_event_kind() {
        for tag in [2_u8, 6, 8, 13, 200] {
            assert!(EventKind::from_tag(tag).is_none(), "tag {tag}");
        }
    }

    #[test]
    fn client_event_kind_ordinals() {
        assert_eq!(ClientEventKind::from(0), ClientEventKind::EnvironmentCollision);
        assert_eq!(ClientEventKind::from(1), ClientEventKind::CarCollision);
        assert_eq!(ClientEventKind::from(7), ClientEventKind::Other(7));
        assert_eq!(u8::from(ClientEventKind::Other(7)), 7);
    }

    #[test]
    fn unknown_event_keeps_its_tag() {
        let event = Event::Unknown { kind: 6 };
        assert_eq!(event.kind(), None);
        assert_eq!(event.tag(), 6);
    }
}
