//! Core event types: `Repeat` and `TimedEvent`.
//!
//! # Repeat model
//!
//! A timed event with a [`Repeat`] fires at `time`, then again every
//! `cycle` nanoseconds.  `count` is the number of firings left *including*
//! the one about to happen; `None` repeats forever.
//!
//! ```text
//! count = Some(n), n <= 1   → fire, then stop
//! count = Some(n), n >  1   → fire, repost with count = n - 1
//! count = None              → fire, repost with count = None
//! repost time               = time + cycle
//! ```

use std::cmp::Ordering;
use std::fmt;

use tempo_core::{EventId, Nanos, SimTime};

/// Boxed timed-event callback.  `FnMut` because a cyclic event re-fires the
/// same closure on every repetition.
pub type EventFn<C> = Box<dyn FnMut(&mut C)>;

// ── Repeat ────────────────────────────────────────────────────────────────────

/// Repetition rule for a cyclic event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Repeat {
    /// Interval between firings in nanoseconds.
    pub cycle: Nanos,
    /// Firings left including the current one; `None` is infinite.
    pub count: Option<u64>,
}

impl Repeat {
    /// Repeat every `cycle` ns with no end.
    pub fn forever(cycle: Nanos) -> Self {
        Self { cycle, count: None }
    }

    /// Fire `count` times in total, `cycle` ns apart.
    pub fn times(cycle: Nanos, count: u64) -> Self {
        Self { cycle, count: Some(count) }
    }

    /// A non-positive cycle would re-fire at the same instant forever.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.cycle <= 0
    }

    /// The rule that applies after one more firing, or `None` if the count
    /// is exhausted.
    pub fn after_firing(self) -> Option<Repeat> {
        match self.count {
            Some(n) if n <= 1 => None,
            Some(n) => Some(Repeat { count: Some(n - 1), ..self }),
            None => Some(self),
        }
    }
}

// ── TimedEvent ────────────────────────────────────────────────────────────────

/// A scheduled unit of work.
///
/// Events order by `(time, seq)`: earliest first, then in insertion order.
/// `seq` is assigned by [`EventQueue::insert`][crate::EventQueue::insert],
/// so a reposted cyclic event queues behind anything already waiting at its
/// new time.
pub struct TimedEvent<C> {
    /// Handle naming the logical obligation; stable across repetitions.
    pub id:     EventId,
    /// Simulated time at which the event is next due.
    pub time:   SimTime,
    /// `None` for one-shot events.
    pub repeat: Option<Repeat>,
    pub(crate) seq: u64,
    callback:   EventFn<C>,
}

impl<C> TimedEvent<C> {
    pub fn new(
        id:       EventId,
        time:     SimTime,
        repeat:   Option<Repeat>,
        callback: impl FnMut(&mut C) + 'static,
    ) -> Self {
        Self {
            id,
            time,
            repeat,
            seq: 0,
            callback: Box::new(callback),
        }
    }

    /// Repeat interval, if cyclic.
    pub fn cycle(&self) -> Option<Nanos> {
        self.repeat.map(|r| r.cycle)
    }

    /// Remaining firings; meaningless for one-shot events.
    pub fn count(&self) -> Option<u64> {
        self.repeat.and_then(|r| r.count)
    }

    /// Insertion sequence number assigned by the queue.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Run the callback against `ctx`.
    #[inline]
    pub fn fire(&mut self, ctx: &mut C) {
        (self.callback)(ctx);
    }

    /// Consume a fired event and produce its next repetition, if any.
    ///
    /// Returns `None` for one-shot events, exhausted counts, and repetitions
    /// whose next time would overflow simulated time.
    pub fn into_next(self) -> Option<TimedEvent<C>> {
        let repeat = self.repeat?.after_firing()?;
        let Some(time) = self.time.checked_offset(repeat.cycle) else {
            tracing::warn!(
                id = self.id.0,
                time = self.time.0,
                cycle = repeat.cycle,
                "cyclic event repost overflows simulated time; dropping"
            );
            return None;
        };
        Some(TimedEvent {
            id: self.id,
            time,
            repeat: Some(repeat),
            seq: 0,
            callback: self.callback,
        })
    }
}

impl<C> PartialEq for TimedEvent<C> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<C> Eq for TimedEvent<C> {}

impl<C> PartialOrd for TimedEvent<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for TimedEvent<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<C> fmt::Debug for TimedEvent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedEvent")
            .field("id", &self.id)
            .field("time", &self.time)
            .field("repeat", &self.repeat)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}
