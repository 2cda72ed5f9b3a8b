//! Platform-specific readiness poller.
//!
//! The poller is the transport's completion object: it turns a
//! non-blocking socket into a "wait until ready or until the bound
//! expires" primitive. Every backend exposes the same three calls
//! (`arm`, `disarm`, `poll`).
//!
//! The concrete implementation is selected at compile time
//! depending on the target operating system.

pub(crate) mod common;

pub(crate) use common::Interest;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod epoll;

#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
mod poll;

#[cfg(windows)]
mod wsapoll;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) type Poller = epoll::EpollPoller;

#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
pub(crate) type Poller = poll::PollPoller;

#[cfg(windows)]
pub(crate) type Poller = wsapoll::WSAPollPoller;

#[cfg(unix)]
pub(crate) mod unix;

#[cfg(unix)]
pub(crate) use unix as platform;

#[cfg(windows)]
pub(crate) mod windows;

#[cfg(windows)]
pub(crate) use windows as platform;
