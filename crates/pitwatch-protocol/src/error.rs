//! Error type for frame decoding.

use crate::event::EventKind;

/// Reasons a datagram could not be decoded into an [`Event`](crate::Event).
///
/// Every variant means the whole frame is discarded; no field of a
/// rejected frame is ever surfaced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The datagram had no bytes at all.
    #[error("empty datagram")]
    Empty,

    /// The payload is shorter than the minimum declared for its kind.
    #[error("{kind} payload too short: need {need} bytes, got {got}")]
    Insufficient {
        /// Kind named by the tag byte.
        kind: EventKind,
        /// Minimum payload length for the kind.
        need: usize,
        /// Actual payload length.
        got: usize,
    },

    /// A field ran past the end of the buffer.
    #[error("{kind} frame truncated while reading {field}")]
    Truncated {
        /// Kind named by the tag byte.
        kind: EventKind,
        /// Name of the field being read.
        field: &'static str,
    },
}
