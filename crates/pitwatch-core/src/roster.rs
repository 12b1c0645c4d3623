//! Roster store: one [`Participant`] per slot.
//!
//! Records are created by the first event that names a slot and are never
//! removed, so a driver who left can still be named in later notices.
//! Every mutation replaces or edits a record under the write lock, so
//! readers see either the whole previous record or the whole new one.

use std::collections::BTreeMap;

use pitwatch_protocol::SlotInfo;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One vehicle slot on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Slot identifier.
    pub slot: u8,
    /// Whether a driver currently occupies the slot.
    pub connected: bool,
    /// Vehicle model name. Only slot info frames carry it.
    pub model: String,
    /// Vehicle skin name.
    pub skin: String,
    /// Driver display name.
    pub driver_name: String,
    /// Driver unique identifier.
    pub driver_guid: String,
}

impl From<SlotInfo> for Participant {
    fn from(info: SlotInfo) -> Self {
        Self {
            slot: info.slot,
            connected: info.connected,
            model: info.model,
            skin: info.skin,
            driver_name: info.driver_name,
            driver_guid: info.driver_guid,
        }
    }
}

/// Concurrency-safe map of slot id to [`Participant`].
#[derive(Debug, Default)]
pub struct Roster {
    slots: RwLock<BTreeMap<u8, Participant>>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for `participant.slot` wholesale.
    pub async fn replace(&self, participant: Participant) {
        self.slots
            .write()
            .await
            .insert(participant.slot, participant);
    }

    /// Mark `slot` as connected with the given driver, keeping any model
    /// and skin already known for the slot.
    ///
    /// Returns the connected count after the update.
    pub async fn connect(&self, slot: u8, driver_name: &str, driver_guid: &str) -> usize {
        let mut slots = self.slots.write().await;
        let entry = slots.entry(slot).or_insert_with(|| Participant {
            slot,
            ..Participant::default()
        });
        entry.connected = true;
        driver_name.clone_into(&mut entry.driver_name);
        driver_guid.clone_into(&mut entry.driver_guid);
        count_connected(&slots)
    }

    /// Clear the connected flag of `slot` if it is known. Nothing else on
    /// the record changes, and unknown slots are left alone.
    ///
    /// Returns the connected count after the update.
    pub async fn disconnect(&self, slot: u8) -> usize {
        let mut slots = self.slots.write().await;
        if let Some(entry) = slots.get_mut(&slot) {
            entry.connected = false;
        }
        count_connected(&slots)
    }

    /// A copy of the record for `slot`.
    pub async fn get(&self, slot: u8) -> Option<Participant> {
        self.slots.read().await.get(&slot).cloned()
    }

    /// The driver name recorded for `slot`, if any.
    pub async fn driver_name(&self, slot: u8) -> Option<String> {
        self.slots
            .read()
            .await
            .get(&slot)
            .map(|p| p.driver_name.clone())
            .filter(|name| !name.is_empty())
    }

    /// Number of slots with a connected driver.
    pub async fn connected_count(&self) -> usize {
        count_connected(&*self.slots.read().await)
    }

    /// Point-in-time copy of every record, ordered by slot.
    pub async fn participants(&self) -> Vec<Participant> {
        self.slots.read().await.values().cloned().collect()
    }

    /// Point-in-time copy of the connected records, ordered by slot.
    pub async fn connected(&self) -> Vec<Participant> {
        self.slots
            .read()
            .await
            .values()
            .filter(|p| p.connected)
            .cloned()
            .collect()
    }
}

fn count_connected(slots: &BTreeMap<u8, Participant>) -> usize {
    slots.values().filter(|p| p.connected).count()
}
