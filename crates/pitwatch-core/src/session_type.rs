//! Session type labels.
//!
//! Both the feed's session-info frame and the info snapshot's `session`
//! field use the same booking-first numbering, so a single table serves
//! both paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of session the server is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    /// Slot booking before the event.
    Booking,
    /// Free practice.
    Practice,
    /// Qualifying.
    Qualifying,
    /// Race.
    Race,
    /// An ordinal outside the known table.
    Unknown,
}

impl SessionType {
    /// Map a session ordinal: 0 Booking, 1 Practice, 2 Qualifying, 3 Race.
    pub const fn from_ordinal(ordinal: i64) -> Self {
        match ordinal {
            0 => Self::Booking,
            1 => Self::Practice,
            2 => Self::Qualifying,
            3 => Self::Race,
            _ => Self::Unknown,
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Booking => "Booking",
            Self::Practice => "Practice",
            Self::Qualifying => "Qualifying",
            Self::Race => "Race",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ordinals() {
        assert_eq!(SessionType::from_ordinal(0), SessionType::Booking);
        assert_eq!(SessionType::from_ordinal(1), SessionType::Practice);
        assert_eq!(SessionType::from_ordinal(2), SessionType::Qualifying);
        assert_eq!(SessionType::from_ordinal(3), SessionType::Race);
    }

    #[test]
    fn out_of_table_ordinals_are_unknown() {
        assert_eq!(SessionType::from_ordinal(4), SessionType::Unknown);
        assert_eq!(SessionType::from_ordinal(-1), SessionType::Unknown);
        assert_eq!(SessionType::Unknown.to_string(), "Unknown");
    }
}
