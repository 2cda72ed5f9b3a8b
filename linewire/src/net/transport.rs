use super::subsystem::Subsystem;
use crate::error::{Error, Result};
use crate::reactor::event::Readiness;
use crate::reactor::poller::platform::{
    INVALID_FD, RawFd, sys_close, sys_connect, sys_get_socket_error, sys_read, sys_shutdown,
    sys_socket, sys_write,
};
use crate::reactor::poller::{Interest, Poller};
use crate::wire::Wire;

use std::io;
use std::net::{Shutdown, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Lifecycle of a [`Transport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Connected,
}

impl State {
    fn describe(self) -> &'static str {
        match self {
            State::Disconnected => "disconnected",
            State::Connected => "connected",
        }
    }
}

/// A TCP connection with synchronous, bounded-wait byte I/O.
///
/// The transport owns its socket, its poller and a single reusable
/// [`Readiness`] record. Only one operation is ever in flight: each call
/// arms the poller, blocks until the socket is ready (or the bound
/// expires) and then performs one non-blocking read or write.
///
/// ```text
/// Disconnected --connect(ok)--> Connected --disconnect--> Disconnected
/// ```
///
/// Every data operation outside `Connected` fails with
/// [`Error::InvalidState`] and leaves the transport untouched.
#[derive(Debug)]
pub struct Transport {
    /// Remote endpoint.
    peer: SocketAddrV4,

    /// Handshake bound.
    connect_timeout: Option<Duration>,

    state: State,

    /// Connected socket, or [`INVALID_FD`].
    fd: RawFd,

    /// Completion object shared by every operation.
    poller: Poller,

    /// Operation record, cleared before each wait.
    readiness: Readiness,

    /// Held while connected.
    subsystem: Option<Subsystem>,
}

impl Transport {
    pub(crate) fn new(peer: SocketAddrV4, connect_timeout: Option<Duration>) -> Result<Self> {
        let poller = Poller::new().map_err(Error::SocketCreationFailed)?;

        Ok(Self {
            peer,
            connect_timeout,
            state: State::Disconnected,
            fd: INVALID_FD,
            poller,
            readiness: Readiness::default(),
            subsystem: None,
        })
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the remote endpoint.
    pub fn peer(&self) -> SocketAddrV4 {
        self.peer
    }

    pub fn is_connected(&self) -> bool {
        self.state == State::Connected
    }

    /// Creates the socket and performs the connection handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if already connected,
    /// - [`Error::SocketCreationFailed`] if the socket cannot be created,
    /// - [`Error::ConnectFailed`] if the handshake fails or exceeds the
    ///   configured bound.
    pub fn connect(&mut self) -> Result<()> {
        if self.state != State::Disconnected {
            return Err(self.invalid("connect"));
        }

        let subsystem = Subsystem::acquire().map_err(Error::SocketCreationFailed)?;

        let addr = SocketAddr::V4(self.peer);
        let fd = sys_socket(&addr).map_err(Error::SocketCreationFailed)?;

        if let Err(source) = self.handshake(fd, &addr) {
            self.poller.disarm(fd);
            sys_close(fd);
            return Err(Error::ConnectFailed {
                peer: self.peer,
                source,
            });
        }

        self.fd = fd;
        self.subsystem = Some(subsystem);
        self.state = State::Connected;

        info!(peer = %self.peer, "connected");
        Ok(())
    }

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if not connected.
    pub fn disconnect(&mut self) -> Result<()> {
        if self.state != State::Connected {
            return Err(self.invalid("disconnect"));
        }

        self.close_socket();
        self.state = State::Disconnected;
        self.subsystem = None;

        info!(peer = %self.peer, "disconnected");
        Ok(())
    }

    /// Receives up to `buffer.len()` bytes.
    ///
    /// Waits at most `timeout` for data, or indefinitely with `None`.
    /// `Ok(0)` means the peer closed the connection; an empty `buffer`
    /// also yields `Ok(0)` without touching the socket.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if nothing arrived within `timeout`,
    /// - [`Error::RecvFailed`] on any other I/O failure,
    /// - [`Error::InvalidState`] if not connected.
    pub fn recv(&mut self, buffer: &mut [u8], timeout: Option<Duration>) -> Result<usize> {
        self.ensure_connected("recv")?;

        if buffer.is_empty() {
            return Ok(0);
        }

        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            let ready = self
                .wait(self.fd, Interest::READ, deadline)
                .map_err(Error::RecvFailed)?;

            if !ready {
                trace!(?timeout, "recv timed out");
                return Err(Error::Timeout);
            }

            let n = sys_read(self.fd, buffer);
            if n >= 0 {
                trace!(bytes = n, "recv");
                return Ok(n as usize);
            }

            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => continue,
                _ => return Err(Error::RecvFailed(err)),
            }
        }
    }

    /// Receives until at least `n` bytes are in `buffer`.
    ///
    /// Returns early, without error, with fewer bytes if the peer closes
    /// the connection. `n` is capped at `buffer.len()`; `timeout` applies
    /// to each individual receive.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if not connected, even when nothing is
    /// requested; otherwise the first failing [`recv`](Self::recv).
    pub fn recv_at_least(
        &mut self,
        buffer: &mut [u8],
        n: usize,
        timeout: Option<Duration>,
    ) -> Result<usize> {
        self.ensure_connected("recv_at_least")?;

        let want = n.min(buffer.len());
        let mut filled = 0;

        while filled < want {
            let got = self.recv(&mut buffer[filled..], timeout)?;
            if got == 0 {
                debug!(filled, want, "peer closed before request was satisfied");
                break;
            }
            filled += got;
        }

        Ok(filled)
    }

    /// Receives until `buffer` is full or the peer closes.
    ///
    /// # Errors
    ///
    /// See [`recv_at_least`](Self::recv_at_least).
    pub fn recv_all(&mut self, buffer: &mut [u8], timeout: Option<Duration>) -> Result<usize> {
        let len = buffer.len();
        self.recv_at_least(buffer, len, timeout)
    }

    /// Receives exactly one byte.
    ///
    /// # Errors
    ///
    /// [`Error::PeerClosed`] if the connection closed instead, otherwise as
    /// [`recv`](Self::recv).
    pub fn recv_one(&mut self, timeout: Option<Duration>) -> Result<u8> {
        let mut byte = [0u8; 1];

        match self.recv(&mut byte, timeout)? {
            0 => Err(Error::PeerClosed),
            _ => Ok(byte[0]),
        }
    }

    /// Performs one write and returns how many bytes the OS accepted.
    ///
    /// The count may be smaller than `buffer.len()`.
    ///
    /// # Errors
    ///
    /// [`Error::SendFailed`] on I/O failure, [`Error::InvalidState`] if not
    /// connected.
    pub fn send(&mut self, buffer: &[u8]) -> Result<usize> {
        self.ensure_connected("send")?;

        if buffer.is_empty() {
            return Ok(0);
        }

        loop {
            self.wait(self.fd, Interest::WRITE, None)
                .map_err(Error::SendFailed)?;

            let n = sys_write(self.fd, buffer);
            if n >= 0 {
                trace!(bytes = n, requested = buffer.len(), "send");
                return Ok(n as usize);
            }

            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => continue,
                _ => return Err(Error::SendFailed(err)),
            }
        }
    }

    /// Sends the entire buffer, looping over partial writes.
    ///
    /// # Errors
    ///
    /// Stops at the first failing [`send`](Self::send). A send that makes no
    /// progress is reported as `SendFailed` with `WriteZero`.
    pub fn write_all(&mut self, mut buffer: &[u8]) -> Result<()> {
        while !buffer.is_empty() {
            let n = self.send(buffer)?;

            if n == 0 {
                return Err(Error::SendFailed(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "send transferred zero bytes",
                )));
            }

            buffer = &buffer[n..];
        }

        Ok(())
    }

    /// Runs the non-blocking handshake on `fd`.
    fn handshake(&mut self, fd: RawFd, addr: &SocketAddr) -> io::Result<()> {
        if sys_connect(fd, addr)? {
            return Ok(());
        }

        let deadline = self.connect_timeout.map(|t| Instant::now() + t);

        if !self.wait(fd, Interest::WRITE, deadline)? {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "connection handshake timed out",
            ));
        }

        sys_get_socket_error(fd)
    }

    /// Blocks until `fd` satisfies `interest` or `deadline` passes.
    ///
    /// Returns `false` on expiry. Signal interruptions and readiness that
    /// does not match `interest` resume the wait with whatever time remains.
    fn wait(
        &mut self,
        fd: RawFd,
        interest: Interest,
        deadline: Option<Instant>,
    ) -> io::Result<bool> {
        self.poller.arm(fd, interest)?;

        loop {
            let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));

            self.poller.poll(&mut self.readiness, remaining)?;
            if self.readiness.satisfies(interest) {
                return Ok(true);
            }

            if let Some(d) = deadline {
                if Instant::now() >= d {
                    return Ok(false);
                }
            }
        }
    }

    fn ensure_connected(&self, operation: &'static str) -> Result<()> {
        if self.state == State::Connected {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.describe(),
        }
    }

    /// Shuts down and closes the socket if one is open.
    fn close_socket(&mut self) {
        if self.fd == INVALID_FD {
            return;
        }

        let _ = sys_shutdown(self.fd, Shutdown::Both);
        self.poller.disarm(self.fd);
        sys_close(self.fd);
        self.fd = INVALID_FD;
    }
}

impl Drop for Transport {
    /// Closes the socket if it is still open.
    ///
    /// The subsystem reference, if any, is released with the transport.
    fn drop(&mut self) {
        self.close_socket();
    }
}

impl Wire for Transport {
    fn recv_one(&mut self, timeout: Option<Duration>) -> Result<u8> {
        Transport::recv_one(self, timeout)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        Transport::write_all(self, bytes)
    }
}
