//! UDP link to the server's plugin feed.
//!
//! The link owns one local socket. The receive loop reads datagrams from
//! it and hands them to the [`Dispatcher`]; the poll orchestrator sends
//! control requests through the same socket via [`ControlChannel`].

use std::net::SocketAddr;
use std::sync::Arc;

use pitwatch_protocol::Request;
use tokio::net::{UdpSocket, lookup_host};
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::FeedError;
use crate::poll::ControlChannel;

/// Largest datagram the receive loop accepts.
const MAX_DATAGRAM: usize = 65_535;

/// A bound UDP socket paired with the server's feed address.
#[derive(Debug)]
pub struct FeedLink {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl FeedLink {
    /// Resolve `host:port` and bind a local socket on an ephemeral port of
    /// the matching address family.
    pub async fn connect(host: &str, port: u16) -> Result<Self, FeedError> {
        let remote = lookup_host((host, port))
            .await
            .map_err(|e| FeedError::Resolve(format!("{host}:{port}: {e}")))?
            .next()
            .ok_or_else(|| FeedError::Resolve(format!("{host}:{port}: no addresses")))?;

        let local = if remote.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| FeedError::Bind(format!("{local}: {e}")))?;

        Ok(Self { socket, remote })
    }

    /// The server's feed address.
    pub const fn remote(&self) -> SocketAddr {
        self.remote
    }

    /// The local address the feed socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, FeedError> {
        self.socket
            .local_addr()
            .map_err(|e| FeedError::Bind(format!("failed to read local address: {e}")))
    }

    /// Register with the server: enable realtime updates, then ask for the
    /// current session info.
    pub async fn handshake(&self) -> Result<(), FeedError> {
        self.send(Request::EnableRealtimeUpdates).await?;
        self.send(Request::SessionInfo).await?;
        info!(remote = %self.remote, "Feed handshake sent");
        Ok(())
    }

    /// Send one control request to the server.
    pub async fn send(&self, request: Request) -> Result<(), FeedError> {
        self.socket
            .send_to(&request.encode(), self.remote)
            .await
            .map(drop)
            .map_err(|e| FeedError::Send(format!("{request:?} to {}: {e}", self.remote)))
    }

    /// Receive and dispatch datagrams until the task is dropped.
    ///
    /// Receive errors and undecodable frames are logged and skipped.
    pub async fn run(self: Arc<Self>, dispatcher: Dispatcher) {
        let mut buf = vec![0_u8; MAX_DATAGRAM];
        loop {
            let (len, from) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "Feed receive failed");
                    continue;
                }
            };

            let Some(datagram) = buf.get(..len) else {
                continue;
            };

            match dispatcher.handle_datagram(datagram).await {
                Ok(Some(notice)) => info!(target: "pitwatch::feed", "{notice}"),
                Ok(None) => {}
                Err(e) => debug!(%from, len, error = %e, "Dropping undecodable frame"),
            }
        }
    }
}

impl ControlChannel for FeedLink {
    async fn send_request(&self, request: Request) -> Result<(), FeedError> {
        self.send(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn handshake_sends_updates_then_session_info() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let link = FeedLink::connect("127.0.0.1", port).await.unwrap();
        link.handshake().await.unwrap();

        let mut buf = [0_u8; 16];
        let (n, _) = server.recv_from(&mut buf).await.unwrap();
        assert_eq!(buf.get(..n).unwrap(), &[3]);
        let (n, _) = server.recv_from(&mut buf).await.unwrap();
        assert_eq!(buf.get(..n).unwrap(), &[7]);
    }
}
