use std::io;

use thiserror::Error;

/// Errors produced by the transport, the line editor and the session.
///
/// The variants fall into four groups:
/// - contract violations: [`Error::InvalidState`],
/// - transient conditions: [`Error::Timeout`],
/// - hard I/O failures: [`Error::SocketCreationFailed`],
///   [`Error::ConnectFailed`], [`Error::RecvFailed`], [`Error::SendFailed`],
///   [`Error::PeerClosed`],
/// - input-protocol violations: [`Error::InvalidInput`].
#[derive(Debug, Error)]
pub enum Error {
    /// The operation is not valid in the transport's current state.
    #[error("operation `{operation}` is invalid while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// A bounded wait expired before the operation completed.
    #[error("operation timed out")]
    Timeout,

    #[error("failed to create socket: {0}")]
    SocketCreationFailed(#[source] io::Error),

    #[error("failed to connect to {peer}: {source}")]
    ConnectFailed {
        peer: std::net::SocketAddrV4,
        #[source]
        source: io::Error,
    },

    #[error("receive failed: {0}")]
    RecvFailed(#[source] io::Error),

    #[error("send failed: {0}")]
    SendFailed(#[source] io::Error),

    /// The peer closed the connection where at least one byte was required.
    #[error("connection closed by peer")]
    PeerClosed,

    /// An unrecognized control byte or a malformed escape sequence.
    #[error("invalid input byte 0x{byte:02x}: {reason}")]
    InvalidInput { byte: u8, reason: &'static str },
}

impl Error {
    /// Returns `true` for [`Error::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }

    /// Returns `true` if the connection can no longer be used.
    ///
    /// Contract violations, timeouts and malformed input leave the
    /// transport usable; everything else does not.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::InvalidState { .. } | Error::Timeout | Error::InvalidInput { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
