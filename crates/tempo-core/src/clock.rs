//! The time-domain authority.
//!
//! [`SimClock`] holds "current simulated time" and the offsets that relate
//! simulated time to mission and epoch time.  [`SharedClock`] wraps a clock
//! in a cloneable handle so several readers can observe the time while the
//! scheduler, the single writer, advances it.
//!
//! Both implement [`TimeDomain`], the seam the scheduler is generic over.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{EpochTime, MissionTime, Nanos, SimTime, TempoError, TempoResult};

// ── TimeDomain ────────────────────────────────────────────────────────────────

/// Read/write access to current simulated time plus pure conversions from
/// the other time domains.
///
/// The scheduler calls [`set_now`][Self::set_now] only from its run loop.
pub trait TimeDomain {
    /// Current simulated time.
    fn now(&self) -> SimTime;

    /// Advance (or set) current simulated time.
    fn set_now(&mut self, t: SimTime);

    /// Convert an epoch time point to simulated time.
    fn epoch_to_sim(&self, e: EpochTime) -> SimTime;

    /// Convert a mission time point to simulated time.
    fn mission_to_sim(&self, m: MissionTime) -> SimTime;
}

// ── ClockConfig ───────────────────────────────────────────────────────────────

/// Offsets and start point for a [`SimClock`].
///
/// Typically loaded from a JSON/TOML file by the application and passed to
/// the scheduler builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// Simulated time the clock starts at.  Must be non-negative.
    pub start_sim_ns: Nanos,

    /// Epoch time (ns) corresponding to simulated time zero.
    pub epoch_origin_ns: Nanos,

    /// Simulated time (ns) at which mission time zero occurs.
    pub mission_start_ns: Nanos,
}

impl ClockConfig {
    /// Reject configurations the clock cannot represent.
    pub fn validate(&self) -> TempoResult<()> {
        if self.start_sim_ns < 0 {
            return Err(TempoError::Config(format!(
                "start_sim_ns must be non-negative, got {}",
                self.start_sim_ns
            )));
        }
        Ok(())
    }

    /// Construct a `SimClock` for this configuration.
    pub fn make_clock(&self) -> TempoResult<SimClock> {
        self.validate()?;
        let mut clock = SimClock::new(
            EpochTime(self.epoch_origin_ns),
            SimTime(self.mission_start_ns),
        );
        clock.current = SimTime(self.start_sim_ns);
        clock.start = clock.current;
        Ok(clock)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Owned time-domain authority.
///
/// Holds no heap data and is cheap to copy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Epoch time of simulated zero.
    pub epoch_origin: EpochTime,
    /// Simulated time of mission zero.
    pub mission_start: SimTime,
    start:   SimTime,
    current: SimTime,
}

impl SimClock {
    /// A clock at simulated zero with the given domain offsets.
    pub fn new(epoch_origin: EpochTime, mission_start: SimTime) -> Self {
        Self {
            epoch_origin,
            mission_start,
            start:   SimTime::ZERO,
            current: SimTime::ZERO,
        }
    }

    /// Simulated time the clock was created at.
    #[inline]
    pub fn start(&self) -> SimTime {
        self.start
    }

    /// Nanoseconds of simulated time elapsed since [`start`][Self::start].
    #[inline]
    pub fn elapsed(&self) -> Nanos {
        self.current.since(self.start)
    }

    #[inline]
    pub fn sim_to_epoch(&self, t: SimTime) -> EpochTime {
        EpochTime(t.0.saturating_add(self.epoch_origin.0))
    }

    #[inline]
    pub fn sim_to_mission(&self, t: SimTime) -> MissionTime {
        MissionTime(t.0.saturating_sub(self.mission_start.0))
    }

    /// Current time in the epoch domain.
    #[inline]
    pub fn epoch_now(&self) -> EpochTime {
        self.sim_to_epoch(self.current)
    }

    /// Current time in the mission domain.
    #[inline]
    pub fn mission_now(&self) -> MissionTime {
        self.sim_to_mission(self.current)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(EpochTime::ZERO, SimTime::ZERO)
    }
}

impl TimeDomain for SimClock {
    #[inline]
    fn now(&self) -> SimTime {
        self.current
    }

    #[inline]
    fn set_now(&mut self, t: SimTime) {
        self.current = t;
    }

    #[inline]
    fn epoch_to_sim(&self, e: EpochTime) -> SimTime {
        SimTime(e.0.saturating_sub(self.epoch_origin.0))
    }

    #[inline]
    fn mission_to_sim(&self, m: MissionTime) -> SimTime {
        SimTime(m.0.saturating_add(self.mission_start.0))
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.current,
            self.mission_now(),
            self.epoch_now()
        )
    }
}

// ── SharedClock ───────────────────────────────────────────────────────────────

/// Cloneable handle to one [`SimClock`].
///
/// Clones observe the same clock.  The scheduler holding one clone is the
/// only component expected to call [`TimeDomain::set_now`]; everyone else
/// reads.  Single-threaded (`!Send`), matching the cooperative run loop.
#[derive(Clone, Debug, Default)]
pub struct SharedClock(Rc<RefCell<SimClock>>);

impl SharedClock {
    pub fn new(clock: SimClock) -> Self {
        SharedClock(Rc::new(RefCell::new(clock)))
    }

    /// Copy of the underlying clock state.
    pub fn snapshot(&self) -> SimClock {
        *self.0.borrow()
    }

    pub fn mission_now(&self) -> MissionTime {
        self.0.borrow().mission_now()
    }

    pub fn epoch_now(&self) -> EpochTime {
        self.0.borrow().epoch_now()
    }

    /// `true` if both handles refer to the same clock.
    pub fn same_clock(&self, other: &SharedClock) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<SimClock> for SharedClock {
    fn from(clock: SimClock) -> Self {
        SharedClock::new(clock)
    }
}

impl TimeDomain for SharedClock {
    fn now(&self) -> SimTime {
        self.0.borrow().now()
    }

    fn set_now(&mut self, t: SimTime) {
        self.0.borrow_mut().set_now(t);
    }

    fn epoch_to_sim(&self, e: EpochTime) -> SimTime {
        self.0.borrow().epoch_to_sim(e)
    }

    fn mission_to_sim(&self, m: MissionTime) -> SimTime {
        self.0.borrow().mission_to_sim(m)
    }
}
