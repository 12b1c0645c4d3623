//! Numeric constants of the plugin protocol.

// ---------------------------------------------------------------------------
// Event kind tags (server -> plugin)
// ---------------------------------------------------------------------------

/// The server reported an error.
pub const KIND_ERROR: u8 = 0;
/// A chat message from a driver.
pub const KIND_CHAT: u8 = 1;
/// A client finished loading. Not decoded.
pub const KIND_CLIENT_LOADED: u8 = 2;
/// A new session started.
pub const KIND_NEW_SESSION: u8 = 3;
/// A driver connected to a slot.
pub const KIND_NEW_CONNECTION: u8 = 4;
/// A driver left a slot.
pub const KIND_CONNECTION_CLOSED: u8 = 5;
/// Realtime position update. Not decoded.
pub const KIND_CAR_UPDATE: u8 = 6;
/// Full description of one slot, sent in reply to a slot info request.
pub const KIND_SLOT_INFO: u8 = 7;
/// A session ended. Not decoded.
pub const KIND_END_SESSION: u8 = 8;
/// A driver completed a lap.
pub const KIND_LAP_COMPLETED: u8 = 9;
/// Protocol version announcement.
pub const KIND_VERSION: u8 = 10;
/// Session description, sent in reply to a session info request.
pub const KIND_SESSION_INFO: u8 = 11;
/// Collision report.
pub const KIND_CLIENT_EVENT: u8 = 12;

// ---------------------------------------------------------------------------
// Request opcodes (plugin -> server)
// ---------------------------------------------------------------------------

/// Enable periodic realtime position updates.
pub const OP_REALTIME_POS_INTERVAL: u8 = 3;
/// Request a slot info reply for one slot.
pub const OP_GET_SLOT_INFO: u8 = 4;
/// Request a session info reply for the current session.
pub const OP_GET_SESSION_INFO: u8 = 7;

// ---------------------------------------------------------------------------
// Minimum payload sizes (bytes after the kind tag)
// ---------------------------------------------------------------------------

/// Minimum chat payload.
pub const MIN_CHAT: usize = 1;
/// Minimum new-session payload.
pub const MIN_NEW_SESSION: usize = 4;
/// Minimum new-connection payload.
pub const MIN_NEW_CONNECTION: usize = 1;
/// Minimum connection-closed payload.
pub const MIN_CONNECTION_CLOSED: usize = 1;
/// Minimum lap-completed payload. The fields occupy the first six bytes;
/// the rest of the leaderboard tail is not interpreted.
pub const MIN_LAP_COMPLETED: usize = 9;
/// Minimum slot-info payload.
pub const MIN_SLOT_INFO: usize = 1;
/// Minimum session-info payload.
pub const MIN_SESSION_INFO: usize = 13;
/// Minimum client-event payload.
pub const MIN_CLIENT_EVENT: usize = 2;
/// Minimum protocol-version payload.
pub const MIN_VERSION: usize = 1;

/// Longest text field the one-byte length prefix can describe.
pub const MAX_TEXT_LEN: usize = u8::MAX as usize;
