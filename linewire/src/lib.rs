//! # linewire
//!
//! **linewire** is the client side of a minimal interactive remote command
//! session. It opens a raw TCP connection to a fixed peer, turns the bytes
//! the peer types into edited command lines and keeps the peer's display
//! in sync while it does.
//!
//! The crate is built from two tightly coupled pieces:
//!
//! - a [`Transport`](net::Transport) that offers synchronous byte I/O with
//!   an optional bound on every wait, on top of a non-blocking socket and a
//!   readiness poller,
//! - a [`LineEditor`](editor::LineEditor) that consumes that transport one
//!   byte at a time (insert, delete, cursor left/right, clear, interrupt)
//!   and redraws the line using nothing but `CR`, spaces and backspaces.
//!
//! A small [`Session`](session::Session) ties them together with a handful
//! of commands (`ls`, `pwd`, `cd`, `echo`, `help`, `exit`).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use linewire::net::TransportBuilder;
//! use linewire::session::Session;
//!
//! fn main() -> linewire::Result<()> {
//!     let mut transport = TransportBuilder::new().build()?;
//!     transport.connect()?;
//!
//!     Session::new(&mut transport).run()?;
//!
//!     transport.disconnect()
//! }
//! ```
//!
//! ## Modules
//!
//! - [`net`]: TCP transport and its builder
//! - [`editor`]: line editor and redraw protocol
//! - [`session`]: command loop over a [`Wire`]
//! - [`logging`]: subscriber setup for the binary

mod error;
mod reactor;
mod wire;

pub mod editor;
pub mod logging;
pub mod net;
pub mod session;

pub use error::{Error, Result};
pub use wire::Wire;

pub use linewire_macros::timeout_test;
