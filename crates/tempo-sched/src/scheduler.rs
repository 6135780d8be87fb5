//! The `Scheduler` struct and its run loop.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tempo_core::{
    EpochTime, EventId, EventIdGen, MissionTime, NANOS_PER_SEC, Nanos, SharedClock, SimTime,
    TimeDomain,
};
use tempo_queue::{EventQueue, ImmediateQueue, Repeat, TimedEvent};

use crate::Component;

/// Name given to schedulers built without one.
pub const DEFAULT_NAME: &str = "scheduler";

// ── RunStats ──────────────────────────────────────────────────────────────────

/// What one `run_*` call did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStats {
    /// Timed-event firings, counting each repetition of a cyclic event.
    pub timed_fired:     usize,
    /// Immediate callbacks executed across all drain passes.
    pub immediate_fired: usize,
    /// Simulated time the clock was left at.
    pub reached:         SimTime,
}

impl RunStats {
    /// Total callbacks executed.
    pub fn fired(&self) -> usize {
        self.timed_fired + self.immediate_fired
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} timed + {} immediate, reached {}",
            self.timed_fired, self.immediate_fired, self.reached
        )
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// The timed event currently executing, so a callback can cancel its own
/// repetitions.
#[derive(Copy, Clone, Debug)]
struct InFlight {
    id:        EventId,
    cancelled: bool,
}

/// The event-scheduling core.
///
/// `Scheduler<D>` owns a time-ordered [`EventQueue`] and a FIFO
/// [`ImmediateQueue`] and advances the time-domain authority `D` as it
/// fires events.  Callbacks receive `&mut Scheduler<D>` so they can post
/// further work, cancel events, or read the clock.
///
/// # Run loop
///
/// Every `run_*` entry point resolves its argument to a simulated-time
/// boundary and calls [`run_until`][Self::run_until]:
///
/// 1. **Drain** the immediate queue.
/// 2. **Fire** each timed event due at or before the boundary, earliest
///    first (ties in posting order).  Before each callback the clock is set
///    to the event's time; after it a cyclic event with firings left is
///    reposted at `time + cycle`, then the immediate queue is drained again.
/// 3. **Settle** the clock at exactly the boundary.
///
/// A drain pass runs only the callbacks queued when the pass began; ones
/// they post wait for the next drain point in the same run.
///
/// # Panics in callbacks
///
/// A panic in a callback is not swallowed.  It unwinds out of the `run_*`
/// call and leaves the scheduler as follows:
///
/// - events already fired earlier in the run are gone, and cyclic ones among
///   them are already reposted;
/// - the panicking timed event is gone and is **not** reposted, even if it
///   had repetitions left;
/// - if the panic came from an immediate callback, the rest of that drain
///   pass is still queued;
/// - the clock reads the time of the last timed event that started firing;
/// - no in-flight record is left behind, so `cancel` on the panicking
///   event's id returns `false`.
///
/// The scheduler stays usable; a later run continues from that state.
pub struct Scheduler<D: TimeDomain = SharedClock> {
    name:      String,
    clock:     D,
    timed:     EventQueue<Scheduler<D>>,
    immediate: ImmediateQueue<Scheduler<D>>,
    ids:       EventIdGen,
    in_flight: Option<InFlight>,
    owner:     Option<Weak<dyn Any>>,
}

impl<D: TimeDomain> Scheduler<D> {
    /// A scheduler named [`DEFAULT_NAME`] driving `clock`.
    pub fn new(clock: D) -> Self {
        Self::with_name(DEFAULT_NAME, clock)
    }

    pub fn with_name(name: impl Into<String>, clock: D) -> Self {
        Self {
            name:      name.into(),
            clock,
            timed:     EventQueue::new(),
            immediate: ImmediateQueue::new(),
            ids:       EventIdGen::new(),
            in_flight: None,
            owner:     None,
        }
    }

    // ── Posting ───────────────────────────────────────────────────────────

    /// Queue `callback` to run at the start of the next drain pass.
    pub fn post_immediate(&mut self, callback: impl FnOnce(&mut Self) + 'static) {
        self.immediate.push(callback);
    }

    /// One-shot event due at simulated time `at`.
    pub fn post(&mut self, at: SimTime, callback: impl FnMut(&mut Self) + 'static) -> EventId {
        self.schedule(at, None, callback)
    }

    /// One-shot event due `secs` seconds after the current simulated time.
    ///
    /// Seconds convert to nanoseconds by truncation toward zero; the due
    /// time saturates at the `i64` range.
    pub fn post_relative(
        &mut self,
        secs:     f64,
        callback: impl FnMut(&mut Self) + 'static,
    ) -> EventId {
        let at = self.clock.now().after_secs(secs);
        self.schedule(at, None, callback)
    }

    /// One-shot event due at mission time `at`, converted through the clock.
    pub fn post_mission(
        &mut self,
        at:       MissionTime,
        callback: impl FnMut(&mut Self) + 'static,
    ) -> EventId {
        let at = self.clock.mission_to_sim(at);
        self.schedule(at, None, callback)
    }

    /// One-shot event due at epoch time `at`, converted through the clock.
    pub fn post_epoch(
        &mut self,
        at:       EpochTime,
        callback: impl FnMut(&mut Self) + 'static,
    ) -> EventId {
        let at = self.clock.epoch_to_sim(at);
        self.schedule(at, None, callback)
    }

    /// Event first due at `at`, then every `cycle` ns.
    ///
    /// `count` is the total number of firings; `None` repeats forever.  A
    /// non-positive `cycle` is logged and the event is posted as one-shot.
    pub fn post_cyclic(
        &mut self,
        at:       SimTime,
        cycle:    Nanos,
        count:    Option<u64>,
        callback: impl FnMut(&mut Self) + 'static,
    ) -> EventId {
        self.schedule(at, Some(Repeat { cycle, count }), callback)
    }

    /// [`post_cyclic`][Self::post_cyclic] with the first firing in mission time.
    pub fn post_cyclic_mission(
        &mut self,
        at:       MissionTime,
        cycle:    Nanos,
        count:    Option<u64>,
        callback: impl FnMut(&mut Self) + 'static,
    ) -> EventId {
        let at = self.clock.mission_to_sim(at);
        self.schedule(at, Some(Repeat { cycle, count }), callback)
    }

    /// [`post_cyclic`][Self::post_cyclic] with the first firing in epoch time.
    pub fn post_cyclic_epoch(
        &mut self,
        at:       EpochTime,
        cycle:    Nanos,
        count:    Option<u64>,
        callback: impl FnMut(&mut Self) + 'static,
    ) -> EventId {
        let at = self.clock.epoch_to_sim(at);
        self.schedule(at, Some(Repeat { cycle, count }), callback)
    }

    fn schedule(
        &mut self,
        at:       SimTime,
        repeat:   Option<Repeat>,
        callback: impl FnMut(&mut Self) + 'static,
    ) -> EventId {
        let repeat = match repeat {
            Some(r) if r.is_degenerate() => {
                tracing::warn!(
                    scheduler = %self.name,
                    cycle = r.cycle,
                    "non-positive cycle; posting as one-shot"
                );
                None
            }
            other => other,
        };
        let id = self.ids.next_id();
        self.timed.insert(TimedEvent::new(id, at, repeat, callback));
        id
    }

    // ── Cancellation ──────────────────────────────────────────────────────

    /// Withdraw a pending timed event, including all its future
    /// repetitions.
    ///
    /// Called from inside the event's own callback, this stops the repost.
    /// Returns `false` if `id` is unknown, already finished, or already
    /// cancelled.
    pub fn cancel(&mut self, id: EventId) -> bool {
        match self.in_flight.as_mut() {
            Some(flight) if flight.id == id => {
                let newly = !flight.cancelled;
                flight.cancelled = true;
                newly
            }
            _ => self.timed.cancel(id),
        }
    }

    /// `true` if `id` is waiting in the timed queue.  An event is not
    /// pending while its own callback runs.
    pub fn is_pending(&self, id: EventId) -> bool {
        self.timed.contains(id)
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Fire everything due at or before `target`, then set the clock to
    /// exactly `target`.
    pub fn run_until(&mut self, target: SimTime) -> RunStats {
        let start = self.clock.now();
        if target < start {
            tracing::warn!(
                scheduler = %self.name,
                now = start.0,
                target = target.0,
                "run boundary is behind the clock; time will move backwards"
            );
        }
        tracing::debug!(scheduler = %self.name, from = start.0, target = target.0, "run start");

        // A run started from inside a callback must hand the caller's
        // in-flight record back on return.
        let outer = self.in_flight.take();
        let mut stats = RunStats::default();
        stats.immediate_fired += self.drain_immediate();

        while self.timed.peek_min_time().is_some_and(|t| t <= target) {
            let Some(mut event) = self.timed.pop_min() else {
                break;
            };
            self.clock.set_now(event.time);
            self.in_flight = Some(InFlight { id: event.id, cancelled: false });
            tracing::trace!(id = event.id.0, time = event.time.0, "firing timed event");

            let fired = panic::catch_unwind(AssertUnwindSafe(|| event.fire(self)));
            let cancelled = self.in_flight.take().is_some_and(|f| f.cancelled);
            if let Err(payload) = fired {
                self.in_flight = outer;
                panic::resume_unwind(payload);
            }
            stats.timed_fired += 1;

            if !cancelled {
                if let Some(next) = event.into_next() {
                    self.timed.insert(next);
                }
            }

            stats.immediate_fired += self.drain_immediate();
        }

        self.in_flight = outer;
        self.clock.set_now(target);
        stats.reached = target;
        tracing::debug!(
            scheduler = %self.name,
            timed = stats.timed_fired,
            immediate = stats.immediate_fired,
            reached = target.0,
            "run complete"
        );
        stats
    }

    /// `run_until(now + delta)`, saturating.
    pub fn run_for(&mut self, delta: Nanos) -> RunStats {
        let target = self.clock.now().saturating_offset(delta);
        self.run_until(target)
    }

    /// `run_until(now + trunc(delta / 1e9))`.
    ///
    /// Note the division: `delta` is scaled *down* by 1e9, unlike
    /// [`post_relative`][Self::post_relative], which scales seconds up.  This
    /// is the long-standing behavior of this entry point and is kept as is;
    /// use [`run_for`][Self::run_for] with nanoseconds for an unambiguous
    /// span.
    pub fn run_secs(&mut self, delta: f64) -> RunStats {
        let span = (delta / NANOS_PER_SEC) as Nanos;
        let target = self.clock.now().saturating_offset(span);
        self.run_until(target)
    }

    /// Convert `target` through the clock, then [`run_until`][Self::run_until].
    pub fn run_until_epoch(&mut self, target: EpochTime) -> RunStats {
        let target = self.clock.epoch_to_sim(target);
        self.run_until(target)
    }

    /// Convert `target` through the clock, then [`run_until`][Self::run_until].
    pub fn run_until_mission(&mut self, target: MissionTime) -> RunStats {
        let target = self.clock.mission_to_sim(target);
        self.run_until(target)
    }

    /// One drain pass.  Returns the number of callbacks executed.
    fn drain_immediate(&mut self) -> usize {
        let pass = self.immediate.pass_len();
        let mut ran = 0;
        while ran < pass {
            let Some(callback) = self.immediate.pop_front() else {
                break;
            };
            callback(self);
            ran += 1;
        }
        ran
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// The time-domain authority this scheduler drives.
    pub fn clock(&self) -> &D {
        &self.clock
    }

    /// Due time of the earliest pending timed event.
    pub fn next_event_time(&self) -> Option<SimTime> {
        self.timed.peek_min_time()
    }

    pub fn pending_timed(&self) -> usize {
        self.timed.len()
    }

    pub fn pending_immediate(&self) -> usize {
        self.immediate.len()
    }

    /// `true` when neither queue holds work.
    pub fn is_idle(&self) -> bool {
        self.timed.is_empty() && self.immediate.is_empty()
    }

    /// Drop all pending work without running it.  The clock is untouched.
    pub fn clear(&mut self) {
        self.timed.clear();
        self.immediate.clear();
    }

    // ── Owner back-reference ──────────────────────────────────────────────

    /// Record the owning context.  Held weakly; never called into.
    pub fn set_owner<O: Any>(&mut self, owner: &Rc<O>) {
        let weak = Rc::downgrade(owner) as Weak<dyn Any>;
        self.owner = Some(weak);
    }

    pub(crate) fn set_owner_weak(&mut self, owner: Weak<dyn Any>) {
        self.owner = Some(owner);
    }

    /// The owning context, if one was set and is still alive.
    pub fn owner(&self) -> Option<Rc<dyn Any>> {
        self.owner.as_ref()?.upgrade()
    }

    /// The owning context downcast to `O`.
    pub fn owner_as<O: Any>(&self) -> Option<Rc<O>> {
        self.owner()?.downcast::<O>().ok()
    }
}

impl<D: TimeDomain> Component for Scheduler<D> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Scheduler<SharedClock> {
    fn default() -> Self {
        Self::new(SharedClock::default())
    }
}

impl<D: TimeDomain> fmt::Debug for Scheduler<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("name", &self.name)
            .field("now", &self.clock.now())
            .field("pending_timed", &self.timed.len())
            .field("pending_immediate", &self.immediate.len())
            .finish_non_exhaustive()
    }
}
