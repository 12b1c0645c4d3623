//! Event encoding.
//!
//! The monitor itself only consumes the feed; the encoder exists so tools
//! and tests can produce byte-exact frames the server would send. Fields
//! the decoder does not keep are written as empty text or zero padding.

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::{MAX_TEXT_LEN, MIN_LAP_COMPLETED};
use crate::event::Event;

impl Event {
    /// Encode this event as a feed datagram.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_u8(self.tag());

        match self {
            Self::Error | Self::Unknown { .. } => {}
            Self::Chat(chat) => {
                buf.put_u8(chat.slot);
                put_text(&mut buf, &chat.message);
            }
            Self::NewSession(session) => {
                buf.put_u8(session.version);
                buf.put_u8(session.session_index);
                buf.put_u8(session.current_session_index);
                buf.put_u8(session.session_count);
                put_text(&mut buf, &session.server_name);
                put_text(&mut buf, &session.track);
                put_text(&mut buf, &session.track_config);
            }
            Self::NewConnection(conn) => {
                put_text(&mut buf, &conn.driver_name);
                put_text(&mut buf, &conn.driver_guid);
                buf.put_u8(conn.slot);
                buf.put_u8(conn.model_id);
                buf.put_u8(conn.skin_id);
            }
            Self::ConnectionClosed(closed) => {
                put_text(&mut buf, &closed.driver_name);
                buf.put_u8(closed.slot);
            }
            Self::LapCompleted(lap) => {
                buf.put_u8(lap.slot);
                buf.put_u32_le(lap.lap_time_ms);
                buf.put_u8(lap.cuts);
                // Empty leaderboard tail up to the declared minimum.
                let written = buf.len().saturating_sub(1);
                buf.put_bytes(0, MIN_LAP_COMPLETED.saturating_sub(written));
            }
            Self::SlotInfo(info) => {
                buf.put_u8(info.slot);
                buf.put_u8(u8::from(info.connected));
                put_text(&mut buf, &info.model);
                put_text(&mut buf, &info.skin);
                put_text(&mut buf, &info.driver_name);
                put_text(&mut buf, &info.driver_guid);
            }
            Self::SessionInfo(info) => {
                buf.put_u8(info.version);
                buf.put_u8(info.session_index);
                buf.put_u8(info.current_session_index);
                buf.put_u8(info.session_count);
                put_text(&mut buf, &info.server_name);
                buf.put_u8(info.session_type);
                buf.put_u16_le(info.duration);
                buf.put_u16_le(info.laps);
                buf.put_u16_le(info.wait_time);
                // ambient temp, road temp, weather graphics, elapsed ms
                for _ in 0..4 {
                    put_text(&mut buf, "");
                }
            }
            Self::ClientEvent(event) => {
                buf.put_u8(event.slot);
                buf.put_u8(event.kind.into());
            }
            Self::Version { version } => buf.put_u8(*version),
        }

        buf.freeze()
    }
}

/// Write a length-prefixed text field, cutting at the last character
/// boundary that fits in 255 bytes.
pub fn put_text(buf: &mut BytesMut, text: &str) {
    let mut end = text.len().min(MAX_TEXT_LEN);
    while !text.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    let bytes = text.as_bytes().get(..end).unwrap_or_default();
    buf.put_u8(u8::try_from(bytes.len()).unwrap_or(u8::MAX));
    buf.put_slice(bytes);
}
