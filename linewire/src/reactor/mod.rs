//! Non-blocking socket plumbing.
//!
//! This module holds the pieces the transport builds its bounded waits
//! from:
//! - the per-platform socket calls (`poller::platform`),
//! - the readiness poller acting as the completion object,
//! - the reusable [`Readiness`](event::Readiness) operation record.
//!
//! Nothing here is public; the transport is the only consumer.

pub(crate) mod event;
pub(crate) mod poller;
