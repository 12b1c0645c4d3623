//! The server info snapshot and the sources that produce it.
//!
//! The dedicated server exposes a JSON document at `GET /INFO` with its
//! name, track, player counts and car list. [`SnapshotSource`] abstracts
//! the fetch so the poll loop and the metrics handler can share one source
//! and tests can supply their own.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Parsed `/INFO` document.
///
/// Every field defaults when absent or `null`. Fields not listed here are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InfoDocument")]
pub struct ServerSnapshot {
    /// Car models available on the server.
    pub cars: Vec<String>,
    /// Connected client count.
    pub clients: u32,
    /// Track identifier.
    pub track: String,
    /// Server display name.
    pub name: String,
    /// Player capacity.
    #[serde(rename = "maxclients")]
    pub max_clients: u32,
    /// Whether pickup mode is enabled.
    #[serde(rename = "pickup")]
    pub pickup_mode: bool,
    /// Session type ordinal.
    pub session: i32,
    /// Track layout.
    pub track_config: String,
    /// Whether joining requires a password.
    #[serde(rename = "pass")]
    pub password_protected: bool,
    /// Time remaining in the current session, in seconds.
    #[serde(rename = "timeleft")]
    pub time_left: i64,
    /// Server software identifier.
    #[serde(rename = "poweredBy")]
    pub powered_by: String,
    /// HTTP port reported by the server.
    pub port: u16,
    /// Ordinals of the configured sessions.
    #[serde(rename = "sessiontypes")]
    pub session_types: Vec<i32>,
    /// Country name and code.
    pub country: Vec<String>,
    /// Server-side timestamp.
    pub timestamp: i64,
    /// In-game time of day.
    #[serde(rename = "timeofday")]
    pub time_of_day: i64,
}

/// Wire shape of `/INFO`. Every key is optional and may be `null`.
///
/// Servers differ in which pickup key they send; some send both.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InfoDocument {
    cars: Option<Vec<String>>,
    clients: Option<u32>,
    track: Option<String>,
    name: Option<String>,
    maxclients: Option<u32>,
    pickup: Option<bool>,
    pickup_mode_enabled: Option<bool>,
    session: Option<i32>,
    track_config: Option<String>,
    pass: Option<bool>,
    timeleft: Option<i64>,
    #[serde(rename = "poweredBy")]
    powered_by: Option<String>,
    port: Option<u16>,
    sessiontypes: Option<Vec<i32>>,
    country: Option<Vec<String>>,
    timestamp: Option<i64>,
    timeofday: Option<i64>,
}

impl From<InfoDocument> for ServerSnapshot {
    fn from(doc: InfoDocument) -> Self {
        Self {
            cars: doc.cars.unwrap_or_default(),
            clients: doc.clients.unwrap_or_default(),
            track: doc.track.unwrap_or_default(),
            name: doc.name.unwrap_or_default(),
            max_clients: doc.maxclients.unwrap_or_default(),
            pickup_mode: doc.pickup.unwrap_or(false) || doc.pickup_mode_enabled.unwrap_or(false),
            session: doc.session.unwrap_or_default(),
            track_config: doc.track_config.unwrap_or_default(),
            password_protected: doc.pass.unwrap_or_default(),
            time_left: doc.timeleft.unwrap_or_default(),
            powered_by: doc.powered_by.unwrap_or_default(),
            port: doc.port.unwrap_or_default(),
            session_types: doc.sessiontypes.unwrap_or_default(),
            country: doc.country.unwrap_or_default(),
            timestamp: doc.timestamp.unwrap_or_default(),
            time_of_day: doc.timeofday.unwrap_or_default(),
        }
    }
}

/// A source of [`ServerSnapshot`] documents.
pub trait SnapshotSource: Send + Sync {
    /// Fetch a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the document cannot be retrieved or
    /// parsed within the source's timeout.
    fn fetch(&self) -> impl Future<Output = Result<ServerSnapshot, FetchError>> + Send;
}

/// Fetches the snapshot from the server's HTTP endpoint via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotSource {
    /// Create a source for `http://{host}:{port}/INFO` with a bounded
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Request`] if the HTTP client cannot be built.
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("http://{host}:{port}/INFO"),
        })
    }

    /// The URL polled by this source.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<ServerSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Request(format!("GET {}: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(format!("failed to read body: {e}")))?;

        Ok(serde_json::from_slice(&body)?)
    }
}
