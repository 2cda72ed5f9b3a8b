//! TCP transport.
//!
//! A [`Transport`] owns one non-blocking TCP connection and exposes
//! synchronous, bounded-wait byte I/O on top of it. Each operation arms
//! the poller for the readiness it needs, blocks on a single
//! ready-or-timeout wait and then performs the non-blocking call.

mod builder;
mod subsystem;
mod transport;

pub use builder::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PEER, TransportBuilder};
pub use transport::{State, Transport};
