//! Lifetime event counters.
//!
//! Each counter is a single [`AtomicU64`], so increments from the feed task
//! and reads from HTTP handlers never tear and never block each other.
//! Counters only go up and are never reset while the process runs.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// The four monotonic counters fed by decoded events.
#[derive(Debug, Default)]
pub struct CounterBank {
    laps: AtomicU64,
    collisions: AtomicU64,
    connections: AtomicU64,
    disconnections: AtomicU64,
}

/// Point-in-time copy of the [`CounterBank`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeCounters {
    /// Laps completed.
    pub laps: u64,
    /// Collision events of any sub-type.
    pub collisions: u64,
    /// Driver connections.
    pub connections: u64,
    /// Driver disconnections.
    pub disconnections: u64,
}

impl CounterBank {
    /// Create a bank with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed lap. Returns the new total.
    pub fn record_lap(&self) -> u64 {
        bump(&self.laps)
    }

    /// Count one collision. Returns the new total.
    pub fn record_collision(&self) -> u64 {
        bump(&self.collisions)
    }

    /// Count one connection. Returns the new total.
    pub fn record_connection(&self) -> u64 {
        bump(&self.connections)
    }

    /// Count one disconnection. Returns the new total.
    pub fn record_disconnection(&self) -> u64 {
        bump(&self.disconnections)
    }

    /// Read all four counters.
    pub fn snapshot(&self) -> LifetimeCounters {
        LifetimeCounters {
            laps: self.laps.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            connections: self.connections.load(Ordering::Relaxed),
            disconnections: self.disconnections.load(Ordering::Relaxed),
        }
    }
}

fn bump(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::Relaxed).saturating_add(1)
}
