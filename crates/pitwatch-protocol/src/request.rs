//! Control requests sent from the monitor to the server.

use bytes::Bytes;

use crate::constants::{OP_GET_SESSION_INFO, OP_GET_SLOT_INFO, OP_REALTIME_POS_INTERVAL};

/// An outbound control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Enable periodic position updates. Sent once to establish the session.
    EnableRealtimeUpdates,
    /// Ask for a session info reply.
    SessionInfo,
    /// Ask for a slot info reply for one slot.
    SlotInfo(u8),
}

impl Request {
    /// Encode this request as a datagram.
    pub fn encode(self) -> Bytes {
        match self {
            Self::EnableRealtimeUpdates => Bytes::from_static(&[OP_REALTIME_POS_INTERVAL]),
            Self::SessionInfo => Bytes::from_static(&[OP_GET_SESSION_INFO]),
            Self::SlotInfo(slot) => Bytes::copy_from_slice(&[OP_GET_SLOT_INFO, slot]),
        }
    }
}
