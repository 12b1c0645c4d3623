//! Error types for the feed link and the snapshot source.

/// Errors raised by the UDP feed link.
///
/// [`Resolve`](Self::Resolve) and [`Bind`](Self::Bind) happen during
/// startup and are fatal. [`Send`](Self::Send) is reported per request and
/// never stops the monitor.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The server address could not be resolved.
    #[error("failed to resolve feed address: {0}")]
    Resolve(String),

    /// The local UDP socket could not be bound.
    #[error("failed to bind feed socket: {0}")]
    Bind(String),

    /// A control request could not be sent.
    #[error("failed to send feed request: {0}")]
    Send(String),
}

/// Errors raised while fetching the info snapshot.
///
/// All variants are recoverable: the previously stored snapshot stays in
/// place until the next successful fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request failed before a response arrived (connect, timeout).
    #[error("snapshot request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("snapshot endpoint returned HTTP {0}")]
    Status(u16),

    /// The body was not a valid snapshot document.
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
