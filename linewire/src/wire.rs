use crate::error::Result;

use std::time::Duration;

/// The byte-level contract the line editor and the session rely on.
///
/// [`Transport`](crate::net::Transport) is the production implementation.
/// Anything that can hand out one byte at a time with an optional bound
/// and accept arbitrary-length writes can stand in for it.
pub trait Wire {
    /// Receives exactly one byte, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`](crate::Error::Timeout) if the bound expires,
    /// [`Error::PeerClosed`](crate::Error::PeerClosed) if the stream ended.
    fn recv_one(&mut self, timeout: Option<Duration>) -> Result<u8>;

    /// Writes all of `bytes`.
    ///
    /// # Errors
    ///
    /// Any I/O failure of the underlying stream.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<W: Wire + ?Sized> Wire for &mut W {
    fn recv_one(&mut self, timeout: Option<Duration>) -> Result<u8> {
        (**self).recv_one(timeout)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Wire;
    use crate::error::{Error, Result};

    use std::collections::VecDeque;
    use std::time::Duration;

    /// One scripted event on the input side.
    pub(crate) enum Step {
        Byte(u8),
        /// Nothing arrives; bounded reads time out.
        Silence,
    }

    /// In-memory wire: replays a script and records everything written.
    ///
    /// Once the script is exhausted every read reports
    /// [`Error::PeerClosed`].
    #[derive(Default)]
    pub(crate) struct Script {
        pub(crate) input: VecDeque<Step>,
        pub(crate) output: Vec<u8>,
    }

    impl Script {
        pub(crate) fn bytes(bytes: &[u8]) -> Self {
            Self::default().then(bytes)
        }

        pub(crate) fn then(mut self, bytes: &[u8]) -> Self {
            self.input.extend(bytes.iter().copied().map(Step::Byte));
            self
        }

        pub(crate) fn then_silence(mut self) -> Self {
            self.input.push_back(Step::Silence);
            self
        }
    }

    impl Wire for Script {
        fn recv_one(&mut self, timeout: Option<Duration>) -> Result<u8> {
            match self.input.pop_front() {
                Some(Step::Byte(b)) => Ok(b),
                Some(Step::Silence) if timeout.is_some() => Err(Error::Timeout),
                Some(Step::Silence) | None => Err(Error::PeerClosed),
            }
        }

        fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
            self.output.extend_from_slice(bytes);
            Ok(())
        }
    }
}
