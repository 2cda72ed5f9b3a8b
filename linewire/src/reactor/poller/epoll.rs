//! Linux `epoll`-based poller implementation.
//!
//! The poller watches exactly one socket: the transport arms it with the
//! interest of the next operation and then blocks in `epoll_wait` until that
//! socket is ready or the bound expires.
//!
//! Registrations are level-triggered, so re-arming with a new interest is a
//! plain `EPOLL_CTL_MOD` and a readiness that is already pending is reported
//! immediately.

use super::common::{Interest, timeout_ms};
use super::platform::RawFd;
use crate::reactor::event::Readiness;

use libc::{
    EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLL_CTL_DEL, EPOLL_CTL_MOD, EPOLLERR, EPOLLHUP, EPOLLIN,
    EPOLLOUT, EPOLLRDHUP, epoll_create1, epoll_ctl, epoll_event, epoll_wait,
};
use std::io;
use std::time::Duration;

/// Linux `epoll` poller.
///
/// Owns the epoll instance and remembers which descriptor, if any, is
/// currently registered with it.
#[derive(Debug)]
pub(crate) struct EpollPoller {
    /// Epoll file descriptor.
    epoll: RawFd,

    /// Descriptor currently registered.
    registered: Option<RawFd>,
}

impl EpollPoller {
    /// Creates a new epoll instance.
    pub(crate) fn new() -> io::Result<Self> {
        let epoll = unsafe { epoll_create1(EPOLL_CLOEXEC) };
        if epoll < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self {
            epoll,
            registered: None,
        })
    }

    /// Arms `fd` with `interest`, registering it on first use.
    pub(crate) fn arm(&mut self, fd: RawFd, interest: Interest) -> io::Result<()> {
        let mut flags = 0;

        // RDHUP stays pending after a half-close; only reads care about it.
        if interest.read {
            flags |= EPOLLIN | EPOLLRDHUP;
        }
        if interest.write {
            flags |= EPOLLOUT;
        }

        let mut event = epoll_event {
            events: flags as u32,
            u64: fd as u64,
        };

        let op = match self.registered {
            Some(current) if current == fd => EPOLL_CTL_MOD,
            Some(current) => {
                self.disarm(current);
                EPOLL_CTL_ADD
            }
            None => EPOLL_CTL_ADD,
        };

        let rc = unsafe { epoll_ctl(self.epoll, op, fd, &mut event) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        self.registered = Some(fd);
        Ok(())
    }

    /// Removes `fd` from the poller.
    pub(crate) fn disarm(&mut self, fd: RawFd) {
        if self.registered == Some(fd) {
            unsafe {
                epoll_ctl(self.epoll, EPOLL_CTL_DEL, fd, std::ptr::null_mut());
            }
            self.registered = None;
        }
    }

    /// Waits for the armed socket.
    ///
    /// On return `readiness` describes what happened; it stays empty if the
    /// bound expired or the wait was interrupted by a signal.
    pub(crate) fn poll(
        &mut self,
        readiness: &mut Readiness,
        timeout: Option<Duration>,
    ) -> io::Result<()> {
        readiness.clear();

        let mut event = epoll_event { events: 0, u64: 0 };

        let n = unsafe { epoll_wait(self.epoll, &mut event, 1, timeout_ms(timeout)) };

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(());
            }
            return Err(err);
        }

        if n == 0 {
            return Ok(());
        }

        let flags = event.events;
        readiness.readable = flags & ((EPOLLIN | EPOLLRDHUP) as u32) != 0;
        readiness.writable = flags & (EPOLLOUT as u32) != 0;
        readiness.hangup = flags & ((EPOLLERR | EPOLLHUP) as u32) != 0;

        Ok(())
    }
}

impl Drop for EpollPoller {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.epoll);
        }
    }
}
