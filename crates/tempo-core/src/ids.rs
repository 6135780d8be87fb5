//! Strongly typed event identifiers.
//!
//! An [`EventId`] is handed back from every timed post and names the logical
//! obligation, so a cyclic event keeps its id across every repetition.
//! Ids are minted by [`EventIdGen`] in strictly increasing order and are
//! never reused.  They play no part in ordering: the event queue stamps its
//! own sequence number at each insertion, and a reposted cyclic event gets a
//! fresh one while keeping its id.

use std::fmt;

/// Handle to a posted timed event.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId(pub u64);

impl EventId {
    /// Sentinel meaning "no valid ID".
    pub const INVALID: EventId = EventId(u64::MAX);
}

impl Default for EventId {
    /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

/// Strictly increasing id generator.
///
/// One generator per scheduler; single-threaded, so the counter alone is
/// deterministic.
#[derive(Clone, Debug, Default)]
pub struct EventIdGen {
    next: u64,
}

impl EventIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id.
    #[inline]
    pub fn next_id(&mut self) -> EventId {
        let id = EventId(self.next);
        self.next += 1;
        id
    }
}
