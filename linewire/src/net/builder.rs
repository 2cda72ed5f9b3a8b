use super::Transport;
use crate::error::Result;

use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

/// The fixed peer a session talks to unless told otherwise.
pub const DEFAULT_PEER: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::LOCALHOST, 4444);

/// Upper bound on the connection handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for configuring and creating a [`Transport`].
///
/// # Examples
///
/// ```rust,ignore
/// let mut transport = TransportBuilder::new()
///     .peer("10.0.0.2:4444".parse()?)
///     .build()?;
/// transport.connect()?;
/// ```
#[derive(Clone, Debug)]
pub struct TransportBuilder {
    /// Remote endpoint.
    peer: SocketAddrV4,

    /// Handshake bound; `None` waits for the OS to give up.
    connect_timeout: Option<Duration>,
}

impl TransportBuilder {
    /// Creates a builder targeting [`DEFAULT_PEER`] with
    /// [`DEFAULT_CONNECT_TIMEOUT`].
    pub fn new() -> Self {
        Self {
            peer: DEFAULT_PEER,
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
        }
    }

    /// Sets the remote endpoint.
    pub fn peer(mut self, peer: SocketAddrV4) -> Self {
        self.peer = peer;
        self
    }

    /// Bounds the connection handshake, or removes the bound with `None`.
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builds a disconnected transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SocketCreationFailed`](crate::Error::SocketCreationFailed)
    /// if the poller cannot be created.
    pub fn build(self) -> Result<Transport> {
        Transport::new(self.peer, self.connect_timeout)
    }
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
