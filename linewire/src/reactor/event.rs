use super::poller::Interest;

/// Outcome of one wait on the poller.
///
/// A single `Readiness` record is owned by the transport and reused for
/// every operation. It is cleared before each wait so a completion that
/// belongs to an earlier operation is never attributed to the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Readiness {
    /// The socket can be read without blocking (data, EOF or error).
    pub(crate) readable: bool,

    /// The socket can be written without blocking.
    pub(crate) writable: bool,

    /// The peer hung up or the socket carries a pending error.
    pub(crate) hangup: bool,
}

impl Readiness {
    /// Forgets any previous completion.
    pub(crate) fn clear(&mut self) {
        *self = Readiness::default();
    }

    /// Returns `true` if the wait completed the operation armed with
    /// `interest`. A hangup or pending error completes any operation.
    pub(crate) fn satisfies(&self, interest: Interest) -> bool {
        (interest.read && self.readable) || (interest.write && self.writable) || self.hangup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_must_match_the_armed_interest() {
        let readable = Readiness {
            readable: true,
            ..Readiness::default()
        };
        assert!(readable.satisfies(Interest::READ));
        assert!(!readable.satisfies(Interest::WRITE));

        let hangup = Readiness {
            hangup: true,
            ..Readiness::default()
        };
        assert!(hangup.satisfies(Interest::WRITE));

        let mut idle = readable;
        idle.clear();
        assert!(!idle.satisfies(Interest::WRITE));
        assert!(!idle.satisfies(Interest::READ));
    }
}
