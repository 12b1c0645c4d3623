//! Human-readable lines describing applied events.
//!
//! The dispatcher builds a [`Notice`] after every store update it makes and
//! the feed loop logs it. Formatting happens on owned data, never while a
//! store lock is held.

use std::fmt;

use pitwatch_protocol::ClientEventKind;

use crate::session_type::SessionType;

/// Connected count after a join or leave, with capacity when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCount {
    /// Connected slots.
    pub connected: usize,
    /// Player capacity from the snapshot.
    pub max: Option<u32>,
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "Players: {}/{max}", self.connected),
            None => write!(f, "Total players: {}", self.connected),
        }
    }
}

/// One notice per applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The server reported an error.
    ServerError,
    /// A chat line.
    Chat {
        /// Sender label.
        driver: String,
        /// Message text.
        message: String,
    },
    /// A new session began.
    NewSession {
        /// Server display name.
        server_name: String,
        /// Composed track description.
        track: String,
        /// One-based number of the running session.
        session_number: u16,
        /// Sessions in the event.
        session_count: u8,
    },
    /// A driver joined.
    Connected {
        /// Driver label.
        driver: String,
        /// Slot taken.
        slot: u8,
        /// Count after the join.
        players: PlayerCount,
    },
    /// A driver left.
    Disconnected {
        /// Driver label.
        driver: String,
        /// Slot released.
        slot: u8,
        /// Count after the leave.
        players: PlayerCount,
    },
    /// A lap was completed.
    Lap {
        /// Driver label.
        driver: String,
        /// Lap duration in milliseconds.
        lap_time_ms: u32,
        /// Track-limit cuts.
        cuts: u8,
    },
    /// The session description changed.
    SessionInfo {
        /// Server display name.
        server_name: String,
        /// Session type.
        session_type: SessionType,
    },
    /// A collision was reported.
    Collision {
        /// Driver label.
        driver: String,
        /// What was hit.
        kind: ClientEventKind,
    },
    /// The server announced its protocol version.
    ProtocolVersion {
        /// Version number.
        version: u8,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerError => f.write_str("SERVER ERROR"),
            Self::Chat { driver, message } => write!(f, "CHAT [{driver}]: {message}"),
            Self::NewSession {
                server_name,
                track,
                session_number,
                session_count,
            } => write!(
                f,
                "NEW SESSION: {server_name} on {track} (session {session_number}/{session_count})"
            ),
            Self::Connected {
                driver,
                slot,
                players,
            } => write!(f, "DRIVER CONNECTED: {driver} (Car #{slot}) | {players}"),
            Self::Disconnected {
                driver,
                slot,
                players,
            } => write!(f, "DRIVER DISCONNECTED: {driver} (Car #{slot}) | {players}"),
            Self::Lap {
                driver,
                lap_time_ms,
                cuts,
            } => {
                write!(f, "LAP COMPLETED: {driver} - {}", format_lap_time(*lap_time_ms))?;
                if *cuts > 0 {
                    write!(f, " [{cuts} cuts]")?;
                }
                Ok(())
            }
            Self::SessionInfo {
                server_name,
                session_type,
            } => write!(f, "SESSION INFO: {server_name} | {session_type}"),
            Self::Collision { driver, kind } => {
                write!(f, "EVENT: {driver} - ")?;
                match kind {
                    ClientEventKind::EnvironmentCollision => f.write_str("Collision with ENV"),
                    ClientEventKind::CarCollision => f.write_str("Collision with CAR"),
                    ClientEventKind::Other(code) => write!(f, "Unknown ({code})"),
                }
            }
            Self::ProtocolVersion { version } => write!(f, "PROTOCOL VERSION: {version}"),
        }
    }
}

/// Render milliseconds as `MM:SS.mmm`. Minutes grow past two digits for
/// very long laps.
pub fn format_lap_time(ms: u32) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{minutes:02}:{seconds:02}.{millis:03}")
}

/// The driver name, or `"Slot #N"` when none is known.
pub fn driver_label(name: Option<&str>, slot: u8) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => format!("Slot #{slot}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lap_time_formatting() {
        assert_eq!(format_lap_time(0), "00:00.000");
        assert_eq!(format_lap_time(83_456), "01:23.456");
        assert_eq!(format_lap_time(59_999), "00:59.999");
        assert_eq!(format_lap_time(600_005), "10:00.005");
    }

    #[test]
    fn lap_notice_shows_cuts_only_when_present() {
        let clean = Notice::Lap {
            driver: "Alice".to_owned(),
            lap_time_ms: 83_456,
            cuts: 0,
        };
        let dirty = Notice::Lap {
            driver: "Alice".to_owned(),
            lap_time_ms: 83_456,
            cuts: 2,
        };
        assert_eq!(clean.to_string(), "LAP COMPLETED: Alice - 01:23.456");
        assert_eq!(dirty.to_string(), "LAP COMPLETED: Alice - 01:23.456 [2 cuts]");
    }

    #[test]
    fn player_count_with_and_without_capacity() {
        let notice = Notice::Connected {
            driver: "Bob".to_owned(),
            slot: 4,
            players: PlayerCount {
                connected: 3,
                max: Some(24),
            },
        };
        assert_eq!(notice.to_string(), "DRIVER CONNECTED: Bob (Car #4) | Players: 3/24");

        let notice = Notice::Disconnected {
            driver: "Bob".to_owned(),
            slot: 4,
            players: PlayerCount {
                connected: 2,
                max: None,
            },
        };
        assert_eq!(
            notice.to_string(),
            "DRIVER DISCONNECTED: Bob (Car #4) | Total players: 2"
        );
    }

    #[test]
    fn collision_labels() {
        let notice = |kind| Notice::Collision {
            driver: driver_label(None, 7),
            kind,
        };
        assert_eq!(
            notice(ClientEventKind::EnvironmentCollision).to_string(),
            "EVENT: Slot #7 - Collision with ENV"
        );
        assert_eq!(
            notice(ClientEventKind::CarCollision).to_string(),
            "EVENT: Slot #7 - Collision with CAR"
        );
        assert_eq!(
            notice(ClientEventKind::Other(9)).to_string(),
            "EVENT: Slot #7 - Unknown (9)"
        );
    }

    #[test]
    fn driver_label_fallback() {
        assert_eq!(driver_label(Some("Carol"), 1), "Carol");
        assert_eq!(driver_label(Some(""), 1), "Slot #1");
        assert_eq!(driver_label(None, 12), "Slot #12");
    }
}
