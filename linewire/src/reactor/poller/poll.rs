//! Portable `poll(2)` poller for Unix targets without epoll.
//!
//! Semantically identical to the epoll backend: one armed socket, one
//! bounded wait. `poll(2)` is stateless, so arming only records the
//! descriptor and interest for the next call.

use super::common::{Interest, timeout_ms};
use super::platform::RawFd;
use crate::reactor::event::Readiness;

use libc::{POLLERR, POLLHUP, POLLIN, POLLNVAL, POLLOUT, nfds_t, poll, pollfd};
use std::io;
use std::time::Duration;

/// `poll(2)` based poller.
#[derive(Debug, Default)]
pub(crate) struct PollPoller {
    /// Armed socket and its interest.
    armed: Option<(RawFd, Interest)>,
}

impl PollPoller {
    pub(crate) fn new() -> io::Result<Self> {
        Ok(Self::default())
    }

    pub(crate) fn arm(&mut self, fd: RawFd, interest: Interest) -> io::Result<()> {
        self.armed = Some((fd, interest));
        Ok(())
    }

    pub(crate) fn disarm(&mut self, fd: RawFd) {
        if matches!(self.armed, Some((armed, _)) if armed == fd) {
            self.armed = None;
        }
    }

    /// Waits for the armed socket; see the epoll backend for the contract.
    pub(crate) fn poll(
        &mut self,
        readiness: &mut Readiness,
        timeout: Option<Duration>,
    ) -> io::Result<()> {
        readiness.clear();

        let Some((fd, interest)) = self.armed else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "no socket armed",
            ));
        };

        let mut events = 0;
        if interest.read {
            events |= POLLIN;
        }
        if interest.write {
            events |= POLLOUT;
        }

        let mut pfd = pollfd {
            fd,
            events,
            revents: 0,
        };

        let rc = unsafe { poll(&mut pfd, 1 as nfds_t, timeout_ms(timeout)) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(());
            }
            return Err(err);
        }

        if rc == 0 {
            return Ok(());
        }

        let re = pfd.revents;
        readiness.readable = re & POLLIN != 0;
        readiness.writable = re & POLLOUT != 0;
        readiness.hangup = re & (POLLERR | POLLHUP | POLLNVAL) != 0;

        Ok(())
    }
}
