//! State aggregation engine for the pitwatch server monitor.
//!
//! The engine keeps a consistent in-memory view of a racing-simulation
//! dedicated server, built from two sources:
//!
//! - the **plugin feed**, a UDP stream of binary events decoded by
//!   [`pitwatch_protocol`] and routed by the [`Dispatcher`]
//! - the **info snapshot**, a JSON document polled over HTTP by the
//!   [`PollOrchestrator`] through a [`SnapshotSource`]
//!
//! # Architecture
//!
//! ```text
//! UDP feed --> FeedLink --> decode_frame --> Dispatcher --+--> Roster
//!                  ^                                      +--> CounterBank
//!                  | slot info requests                   +--> ContextStore
//!                  |                                           ^
//! PollOrchestrator +---- SnapshotSource (HTTP /INFO) ----------+
//! ```
//!
//! All stores live in one [`ServerState`] shared by `Arc` between the feed
//! task, the poll task and HTTP readers. Each store has its own lock, held
//! only for the in-memory update and never across network I/O.

pub mod context;
pub mod counters;
pub mod dispatch;
pub mod error;
pub mod feed;
pub mod notice;
pub mod poll;
pub mod roster;
pub mod session_type;
pub mod snapshot;
pub mod state;

pub use context::{ContextStore, SessionContext, SnapshotRecord};
pub use counters::{CounterBank, LifetimeCounters};
pub use dispatch::Dispatcher;
pub use error::{FeedError, FetchError};
pub use feed::FeedLink;
pub use notice::{Notice, PlayerCount};
pub use poll::{ControlChannel, CycleReport, PollConfig, PollOrchestrator, PollTrigger};
pub use roster::{Participant, Roster};
pub use session_type::SessionType;
pub use snapshot::{HttpSnapshotSource, ServerSnapshot, SnapshotSource};
pub use state::{ServerState, ServerSummary, StateView};
