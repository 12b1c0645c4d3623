//! Exporter configuration.
//!
//! Everything comes from environment variables, each with a default so the
//! exporter starts against a local server with no setup at all.

use std::time::Duration;

use pitwatch_core::PollConfig;

/// Largest accepted `PITWATCH_SLOT_COUNT`: one request per possible slot id.
pub const MAX_SLOT_COUNT: u16 = 256;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that does not parse or is out of range.
    #[error("invalid {key}: {reason}")]
    Invalid {
        /// The offending variable.
        key: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Complete exporter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Host of the dedicated server, used for both the feed and `/INFO`.
    pub server_host: String,
    /// UDP port of the server's plugin feed.
    pub udp_port: u16,
    /// HTTP port of the server's info endpoint.
    pub http_port: u16,
    /// Port the exporter listens on.
    pub exporter_port: u16,
    /// Time between scheduled poll cycles.
    pub poll_interval: Duration,
    /// Slots asked for per poll burst.
    pub slot_count: u16,
    /// Timeout of one snapshot fetch.
    pub snapshot_timeout: Duration,
}

impl ExporterConfig {
    /// Load configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AC_SERVER_HOST` | `127.0.0.1` |
    /// | `AC_SERVER_UDP_PORT` | `9600` |
    /// | `AC_SERVER_HTTP_PORT` | `8081` |
    /// | `EXPORTER_PORT` | `9101` |
    /// | `PITWATCH_POLL_INTERVAL_SECS` | `30` |
    /// | `PITWATCH_SLOT_COUNT` | `50` |
    /// | `PITWATCH_SNAPSHOT_TIMEOUT_MS` | `3000` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("AC_SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        if server_host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "AC_SERVER_HOST",
                reason: "must not be empty".to_owned(),
            });
        }

        let udp_port: u16 = parse(&lookup, "AC_SERVER_UDP_PORT", "9600")?;
        let http_port: u16 = parse(&lookup, "AC_SERVER_HTTP_PORT", "8081")?;
        let exporter_port: u16 = parse(&lookup, "EXPORTER_PORT", "9101")?;

        let poll_interval_secs: u64 = parse(&lookup, "PITWATCH_POLL_INTERVAL_SECS", "30")?;
        if poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "PITWATCH_POLL_INTERVAL_SECS",
                reason: "must be at least 1".to_owned(),
            });
        }

        let slot_count: u16 = parse(&lookup, "PITWATCH_SLOT_COUNT", "50")?;
        if slot_count > MAX_SLOT_COUNT {
            return Err(ConfigError::Invalid {
                key: "PITWATCH_SLOT_COUNT",
                reason: format!("{slot_count} exceeds {MAX_SLOT_COUNT}"),
            });
        }

        let snapshot_timeout_ms: u64 = parse(&lookup, "PITWATCH_SNAPSHOT_TIMEOUT_MS", "3000")?;

        Ok(Self {
            server_host,
            udp_port,
            http_port,
            exporter_port,
            poll_interval: Duration::from_secs(poll_interval_secs),
            slot_count,
            snapshot_timeout: Duration::from_millis(snapshot_timeout_ms),
        })
    }

    /// Poll loop settings derived from this configuration.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: self.poll_interval,
            slot_count: self.slot_count,
            ..PollConfig::default()
        }
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .unwrap_or_else(|| default.to_owned())
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}
