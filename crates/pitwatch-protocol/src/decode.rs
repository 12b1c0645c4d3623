//! Datagram decoding.
//!
//! [`decode_frame`] is a pure function: it reads the kind tag, checks the
//! minimum payload length for that kind and then reads every field
//! strictly. Any shortfall yields a [`DecodeError`] and no event.

use bytes::Buf;

use crate::error::DecodeError;
use crate::event::{
    Chat, ClientEvent, ConnectionClosed, Event, EventKind, LapCompleted, NewConnection,
    NewSession, SessionInfo, SlotInfo,
};

/// Decode one datagram into an [`Event`].
///
/// Kinds without a decoder produce [`Event::Unknown`] regardless of their
/// payload.
///
/// # Errors
///
/// - [`DecodeError::Empty`] for a zero-length datagram
/// - [`DecodeError::Insufficient`] when the payload is below the kind
///   minimum
/// - [`DecodeError::Truncated`] when a field or text body runs past the end
pub fn decode_frame(datagram: &[u8]) -> Result<Event, DecodeError> {
    let Some((&tag, payload)) = datagram.split_first() else {
        return Err(DecodeError::Empty);
    };

    let Some(kind) = EventKind::from_tag(tag) else {
        return Ok(Event::Unknown { kind: tag });
    };

    if payload.len() < kind.min_payload() {
        return Err(DecodeError::Insufficient {
            kind,
            need: kind.min_payload(),
            got: payload.len(),
        });
    }

    let mut r = FrameReader::new(kind, payload);
    let event = match kind {
        EventKind::Error => Event::Error,
        EventKind::Chat => Event::Chat(Chat {
            slot: r.u8("slot")?,
            message: r.text("message")?,
        }),
        EventKind::NewSession => Event::NewSession(NewSession {
            version: r.u8("version")?,
            session_index: r.u8("session_index")?,
            current_session_index: r.u8("current_session_index")?,
            session_count: r.u8("session_count")?,
            server_name: r.text("server_name")?,
            track: r.text("track")?,
            track_config: r.text("track_config")?,
        }),
        EventKind::NewConnection => Event::NewConnection(NewConnection {
            driver_name: r.text("driver_name")?,
            driver_guid: r.text("driver_guid")?,
            slot: r.u8("slot")?,
            model_id: r.u8("model_id")?,
            skin_id: r.u8("skin_id")?,
        }),
        EventKind::ConnectionClosed => Event::ConnectionClosed(ConnectionClosed {
            driver_name: r.text("driver_name")?,
            slot: r.u8("slot")?,
        }),
        EventKind::LapCompleted => Event::LapCompleted(LapCompleted {
            slot: r.u8("slot")?,
            lap_time_ms: r.u32("lap_time_ms")?,
            cuts: r.u8("cuts")?,
        }),
        EventKind::SlotInfo => Event::SlotInfo(SlotInfo {
            slot: r.u8("slot")?,
            connected: r.u8("connected")? == 1,
            model: r.text("model")?,
            skin: r.text("skin")?,
            driver_name: r.text("driver_name")?,
            driver_guid: r.text("driver_guid")?,
        }),
        EventKind::SessionInfo => {
            let info = SessionInfo {
                version: r.u8("version")?,
                session_index: r.u8("session_index")?,
                current_session_index: r.u8("current_session_index")?,
                session_count: r.u8("session_count")?,
                server_name: r.text("server_name")?,
                session_type: r.u8("session_type")?,
                duration: r.u16("duration")?,
                laps: r.u16("laps")?,
                wait_time: r.u16("wait_time")?,
            };
            r.skip_text("ambient_temp")?;
            r.skip_text("road_temp")?;
            r.skip_text("weather_graphics")?;
            r.skip_text("elapsed_ms")?;
            Event::SessionInfo(info)
        }
        EventKind::ClientEvent => Event::ClientEvent(ClientEvent {
            slot: r.u8("slot")?,
            kind: r.u8("event_type")?.into(),
        }),
        EventKind::Version => Event::Version {
            version: r.u8("version")?,
        },
    };

    Ok(event)
}

/// Strict cursor over a frame payload.
struct FrameReader<'a> {
    kind: EventKind,
    buf: &'a [u8],
}

impl<'a> FrameReader<'a> {
    const fn new(kind: EventKind, buf: &'a [u8]) -> Self {
        Self { kind, buf }
    }

    const fn truncated(&self, field: &'static str) -> DecodeError {
        DecodeError::Truncated {
            kind: self.kind,
            field,
        }
    }

    fn ensure(&self, len: usize, field: &'static str) -> Result<(), DecodeError> {
        if self.buf.remaining() < len {
            return Err(self.truncated(field));
        }
        Ok(())
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        self.ensure(1, field)?;
        Ok(self.buf.get_u8())
    }

    fn u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        self.ensure(2, field)?;
        Ok(self.buf.get_u16_le())
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        self.ensure(4, field)?;
        Ok(self.buf.get_u32_le())
    }

    /// Read a length-prefixed text field. Trailing NULs are stripped.
    fn text(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = usize::from(self.u8(field)?);
        self.ensure(len, field)?;
        let raw = self.buf.copy_to_bytes(len);
        Ok(String::from_utf8_lossy(&raw)
            .trim_end_matches('\0')
            .to_owned())
    }

    fn skip_text(&mut self, field: &'static str) -> Result<(), DecodeError> {
        let len = usize::from(self.u8(field)?);
        self.ensure(len, field)?;
        self.buf.advance(len);
        Ok(())
    }
}
