//! Prometheus text exposition.
//!
//! Every scrape builds a fresh [`Registry`], so nothing about the metric set
//! outlives the request. Gauges describe the last good snapshot and carry
//! `server_name`, `track` and `powered_by` labels. Without any snapshot a
//! short unlabelled block reports the server as down. The lifetime
//! counters are always present.

use pitwatch_core::{LifetimeCounters, ServerSnapshot};
use prometheus::{Encoder, IntCounter, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

/// Content type of the rendered text.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

const SNAPSHOT_LABELS: [&str; 3] = ["server_name", "track", "powered_by"];

/// Render the full metrics page.
pub fn render(
    snapshot: Option<&ServerSnapshot>,
    counters: &LifetimeCounters,
) -> Result<String, prometheus::Error> {
    let registry = Registry::new();

    match snapshot {
        Some(snap) => register_snapshot(&registry, snap)?,
        None => {
            gauge(&registry, "ac_server_up", "Server availability (1 = up, 0 = down)", 0)?;
            gauge(&registry, "ac_server_players", "Current number of connected players", 0)?;
            gauge(&registry, "ac_server_max_players", "Maximum player capacity", 0)?;
        }
    }

    counter(&registry, "ac_server_lap_completed_total", "Total laps completed", counters.laps)?;
    counter(
        &registry,
        "ac_server_collisions_total",
        "Total collision events",
        counters.collisions,
    )?;
    counter(
        &registry,
        "ac_server_connections_total",
        "Total player connections",
        counters.connections,
    )?;
    counter(
        &registry,
        "ac_server_disconnections_total",
        "Total player disconnections",
        counters.disconnections,
    )?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("non-UTF-8 output: {e}")))
}

fn register_snapshot(registry: &Registry, snap: &ServerSnapshot) -> Result<(), prometheus::Error> {
    let labels = [snap.name.as_str(), snap.track.as_str(), snap.powered_by.as_str()];
    let cars = i64::try_from(snap.cars.len()).unwrap_or(i64::MAX);

    let gauges: [(&str, &str, i64); 8] = [
        ("ac_server_up", "Server availability (1 = up, 0 = down)", 1),
        (
            "ac_server_players",
            "Current number of connected players",
            i64::from(snap.clients),
        ),
        (
            "ac_server_max_players",
            "Maximum player capacity",
            i64::from(snap.max_clients),
        ),
        (
            "ac_server_session",
            "Current session type (0=Booking, 1=Practice, 2=Qualifying, 3=Race)",
            i64::from(snap.session),
        ),
        ("ac_server_cars_available", "Number of available car models", cars),
        (
            "ac_server_password_protected",
            "Whether server requires password",
            i64::from(snap.password_protected),
        ),
        (
            "ac_server_pickup_mode",
            "Whether pickup mode is enabled",
            i64::from(snap.pickup_mode),
        ),
        (
            "ac_server_time_left",
            "Time remaining in current session (seconds)",
            snap.time_left,
        ),
    ];

    for (name, help, value) in gauges {
        let vec = IntGaugeVec::new(Opts::new(name, help), &SNAPSHOT_LABELS)?;
        vec.get_metric_with_label_values(&labels)?.set(value);
        registry.register(Box::new(vec))?;
    }
    Ok(())
}

fn gauge(registry: &Registry, name: &str, help: &str, value: i64) -> Result<(), prometheus::Error> {
    let gauge = IntGauge::with_opts(Opts::new(name, help))?;
    gauge.set(value);
    registry.register(Box::new(gauge))
}

fn counter(registry: &Registry, name: &str, help: &str, value: u64) -> Result<(), prometheus::Error> {
    let counter = IntCounter::with_opts(Opts::new(name, help))?;
    counter.inc_by(value);
    registry.register(Box::new(counter))
}
