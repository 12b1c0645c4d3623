//! Wire format of the dedicated-server UDP plugin feed.
//!
//! The server pushes one event per datagram. The first byte is the event
//! kind tag; the remainder is a kind-specific payload built from
//! little-endian fixed-width integers and length-prefixed text fields (one
//! length byte followed by that many bytes, no terminator).
//!
//! # Modules
//!
//! - [`constants`] -- Kind tags, request opcodes and minimum payload sizes
//! - [`event`] -- The closed [`Event`] enum and its payload structs
//! - [`decode`] -- Datagram to [`Event`] decoding
//! - [`encode`] -- [`Event`] to datagram encoding
//! - [`request`] -- Outbound control requests sent back to the server
//! - [`error`] -- [`DecodeError`]
//!
//! Decoding is all-or-nothing: a frame either yields a complete [`Event`]
//! or a [`DecodeError`], never a partially populated value.

pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod event;
pub mod request;

pub use decode::decode_frame;
pub use error::DecodeError;
pub use event::{
    Chat, ClientEvent, ClientEventKind, ConnectionClosed, Event, EventKind, LapCompleted,
    NewConnection, NewSession, SessionInfo, SlotInfo,
};
pub use request::Request;
