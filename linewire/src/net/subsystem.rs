//! Process-wide networking subsystem handle.
//!
//! Some platforms (Windows) require the socket library to be started
//! before the first socket is created and stopped after the last one is
//! closed. Every connected transport holds one [`Subsystem`] reference;
//! the first acquire starts the library and the last release stops it.

use crate::reactor::poller::platform::{sys_cleanup, sys_startup};

use std::io;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Number of live [`Subsystem`] references in this process.
static USERS: Mutex<usize> = Mutex::new(0);

/// One reference to the started networking subsystem.
///
/// Dropping the last reference tears the subsystem down.
#[derive(Debug)]
pub(crate) struct Subsystem {
    _private: (),
}

impl Subsystem {
    /// Takes a reference, starting the subsystem if none is held yet.
    pub(crate) fn acquire() -> io::Result<Self> {
        let mut users = USERS.lock().unwrap_or_else(PoisonError::into_inner);

        if *users == 0 {
            sys_startup()?;
            debug!("networking subsystem started");
        }

        *users += 1;
        Ok(Self { _private: () })
    }
}

impl Drop for Subsystem {
    fn drop(&mut self) {
        let mut users = USERS.lock().unwrap_or_else(PoisonError::into_inner);

        *users -= 1;
        if *users == 0 {
            sys_cleanup();
            debug!("networking subsystem stopped");
        }
    }
}

/// Returns the number of live references.
#[cfg(test)]
pub(crate) fn users() -> usize {
    *USERS.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_are_counted_and_released() {
        let before = users();

        let first = Subsystem::acquire().expect("first acquire");
        let second = Subsystem::acquire().expect("second acquire");
        assert_eq!(users(), before + 2);

        drop(first);
        assert_eq!(users(), before + 1);

        drop(second);
        assert_eq!(users(), before);
    }
}
