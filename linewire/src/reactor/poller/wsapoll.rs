//! Windows `WSAPoll`-based poller implementation.
//!
//! A readiness-based backend that mirrors the Unix pollers: the transport
//! arms one socket with an interest and then blocks in `WSAPoll` until the
//! socket is ready or the bound expires.

use super::common::{Interest, timeout_ms};
use super::platform::RawFd;
use crate::reactor::event::Readiness;

use std::io;
use std::time::Duration;

use windows_sys::Win32::Networking::WinSock::{
    POLLERR, POLLHUP, POLLNVAL, POLLRDNORM, POLLWRNORM, SOCKET_ERROR, WSAPOLLFD, WSAPoll,
};

/// Windows poller based on `WSAPoll`.
#[derive(Debug, Default)]
pub(crate) struct WSAPollPoller {
    /// Armed socket and its interest.
    armed: Option<(RawFd, Interest)>,
}

impl WSAPollPoller {
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

    /// Waits for the armed socket.
    ///
    /// On return `readiness` describes what happened; it stays empty if the
    /// bound expired.
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
            events |= POLLRDNORM;
        }
        if interest.write {
            events |= POLLWRNORM;
        }

        let mut pfd = WSAPOLLFD {
            fd,
            events,
            revents: 0,
        };

        let rc = unsafe { WSAPoll(&mut pfd, 1, timeout_ms(timeout)) };
        if rc == SOCKET_ERROR {
            return Err(io::Error::last_os_error());
        }

        if rc == 0 {
            return Ok(());
        }

        let re = pfd.revents;
        readiness.readable = re & POLLRDNORM != 0;
        readiness.writable = re & POLLWRNORM != 0;
        readiness.hangup = re & (POLLERR | POLLHUP | POLLNVAL) != 0;

        Ok(())
    }
}
