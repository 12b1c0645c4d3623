//! Poll orchestrator: snapshot refresh plus slot info bursts.
//!
//! Each cycle fetches the info snapshot, asks the server for a slot info
//! reply for every slot in `0..slot_count`, waits a grace window for the
//! replies to land in the roster through the feed loop, and then reports.
//!
//! Cycles run once at startup, on a fixed interval, and after a session
//! change raised through the [`PollTrigger`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pitwatch_protocol::Request;
use tokio::sync::Notify;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::snapshot::SnapshotSource;
use crate::state::{ServerState, ServerSummary};

/// Timing and burst size of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between scheduled cycles.
    pub interval: Duration,
    /// Number of slots asked for per burst, starting at slot 0.
    pub slot_count: u16,
    /// Pause between two slot info requests.
    pub pacing: Duration,
    /// Wait after the burst before reporting.
    pub grace: Duration,
    /// Delay between a session change and the cycle it triggers.
    pub settle: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            slot_count: 50,
            pacing: Duration::from_millis(10),
            grace: Duration::from_secs(1),
            settle: Duration::from_secs(2),
        }
    }
}

/// Wakes the poll loop for an out-of-schedule cycle.
///
/// Raising the trigger never blocks. A request made while a cycle is
/// running is kept and starts the next cycle once the current one ends.
#[derive(Debug, Clone, Default)]
pub struct PollTrigger(Arc<Notify>);

impl PollTrigger {
    /// Create a trigger with no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a cycle.
    pub fn request(&self) {
        self.0.notify_one();
    }

    /// Wait for the next request.
    pub async fn requested(&self) {
        self.0.notified().await;
    }
}

/// Outbound path for control requests.
pub trait ControlChannel: Send + Sync {
    /// Send one request to the server.
    fn send_request(&self, request: Request) -> impl Future<Output = Result<(), FeedError>> + Send;
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Whether the snapshot fetch succeeded.
    pub snapshot_refreshed: bool,
    /// Slot info requests sent without error.
    pub requests_sent: u16,
    /// Server status after the grace window.
    pub summary: ServerSummary,
}

/// Drives poll cycles against a [`SnapshotSource`] and a
/// [`ControlChannel`].
#[derive(Debug)]
pub struct PollOrchestrator<S, C> {
    state: Arc<ServerState>,
    source: Arc<S>,
    channel: Arc<C>,
    trigger: PollTrigger,
    config: PollConfig,
}

impl<S: SnapshotSource, C: ControlChannel> PollOrchestrator<S, C> {
    /// Create an orchestrator.
    pub const fn new(
        state: Arc<ServerState>,
        source: Arc<S>,
        channel: Arc<C>,
        trigger: PollTrigger,
        config: PollConfig,
    ) -> Self {
        Self {
            state,
            source,
            channel,
            trigger,
            config,
        }
    }

    /// Run one cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let snapshot_refreshed = self.state.refresh_snapshot(&*self.source).await.is_ok();

        let mut requests_sent: u16 = 0;
        for index in 0..self.config.slot_count {
            let Ok(slot) = u8::try_from(index) else {
                break;
            };
            if slot > 0 {
                time::sleep(self.config.pacing).await;
            }
            match self.channel.send_request(Request::SlotInfo(slot)).await {
                Ok(()) => requests_sent = requests_sent.saturating_add(1),
                Err(e) => warn!(slot, error = %e, "Slot info request failed"),
            }
        }

        time::sleep(self.config.grace).await;

        CycleReport {
            snapshot_refreshed,
            requests_sent,
            summary: self.state.summary().await,
        }
    }

    /// Run forever: one cycle now, then one per interval tick or trigger.
    pub async fn run(self) {
        log_report(&self.run_cycle().await);

        let mut ticker = time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately and the startup cycle already ran.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = self.trigger.requested() => {
                    debug!(settle_ms = self.config.settle.as_millis(), "Session change, scheduling poll");
                    time::sleep(self.config.settle).await;
                }
            }
            log_report(&self.run_cycle().await);
        }
    }
}

fn log_report(report: &CycleReport) {
    let summary = &report.summary;
    let session = summary
        .session
        .map_or_else(|| "Unknown".to_owned(), |s| s.to_string());
    let players = summary.max_players.map_or_else(
        || summary.connected.len().to_string(),
        |max| format!("{}/{max}", summary.connected.len()),
    );

    info!(
        server = %summary.server_name,
        track = %summary.track,
        session = %session,
        players = %players,
        requests_sent = report.requests_sent,
        snapshot_refreshed = report.snapshot_refreshed,
        "Poll cycle complete"
    );
    for p in &summary.connected {
        debug!(slot = p.slot, driver = %p.driver_name, model = %p.model, "Connected driver");
    }
}
