//! Time points in the three supported domains.
//!
//! # Design
//!
//! Every domain is an `i64` count of nanoseconds.  Simulated time is the
//! canonical one: the scheduler orders and fires events in it.  Mission and
//! epoch time are alternate views related to simulated time by a fixed
//! offset held in [`SimClock`][crate::SimClock]:
//!
//!   sim_time = epoch_time - epoch_origin
//!   sim_time = mission_time + mission_start
//!
//! Integer nanoseconds keep all schedule arithmetic exact.  All arithmetic
//! here saturates at the `i64` bounds instead of wrapping, so a far-future
//! event clamps to `i64::MAX` rather than landing in the past.

use std::fmt;

/// A signed span of time in nanoseconds.
pub type Nanos = i64;

/// Nanoseconds per second, as used by every seconds conversion.
pub const NANOS_PER_SEC: f64 = 1e9;

/// Convert fractional seconds to nanoseconds.
///
/// Truncates toward zero.  Out-of-range values saturate at `i64::MIN` /
/// `i64::MAX` and `NaN` becomes `0` (Rust's float-to-int `as` semantics).
#[inline]
pub fn secs_to_nanos(secs: f64) -> Nanos {
    (secs * NANOS_PER_SEC) as Nanos
}

/// Generate a nanosecond time-point wrapper for one time domain.
macro_rules! time_point {
    ($(#[$attr:meta])* $vis:vis struct $name:ident; $tag:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub Nanos);

        impl $name {
            pub const ZERO: $name = $name(0);
            pub const MAX: $name = $name(Nanos::MAX);

            /// Raw nanosecond value.
            #[inline(always)]
            pub fn nanos(self) -> Nanos {
                self.0
            }

            /// The point `delta` nanoseconds after `self`, saturating.
            #[inline]
            pub fn saturating_offset(self, delta: Nanos) -> $name {
                $name(self.0.saturating_add(delta))
            }

            /// The point `delta` nanoseconds after `self`, or `None` on overflow.
            #[inline]
            pub fn checked_offset(self, delta: Nanos) -> Option<$name> {
                self.0.checked_add(delta).map($name)
            }

            /// Nanoseconds elapsed from `earlier` to `self`, saturating.
            #[inline]
            pub fn since(self, earlier: $name) -> Nanos {
                self.0.saturating_sub(earlier.0)
            }
        }

        impl std::ops::Add<Nanos> for $name {
            type Output = $name;
            #[inline]
            fn add(self, rhs: Nanos) -> $name {
                self.saturating_offset(rhs)
            }
        }

        impl std::ops::Sub for $name {
            type Output = Nanos;
            #[inline]
            fn sub(self, rhs: $name) -> Nanos {
                self.since(rhs)
            }
        }

        impl From<Nanos> for $name {
            #[inline(always)]
            fn from(ns: Nanos) -> $name {
                $name(ns)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}ns", $tag, self.0)
            }
        }
    };
}

time_point! {
    /// Simulated time: the scheduler's authoritative clock.
    pub struct SimTime; "S+"
}

time_point! {
    /// Mission-elapsed time, zero at the configured mission start.
    pub struct MissionTime; "M+"
}

time_point! {
    /// Absolute epoch time (e.g. nanoseconds since the Unix epoch).
    pub struct EpochTime; "E+"
}

impl SimTime {
    /// Simulated time `secs` seconds after `self`, truncated to whole
    /// nanoseconds.
    #[inline]
    pub fn after_secs(self, secs: f64) -> SimTime {
        self.saturating_offset(secs_to_nanos(secs))
    }

    /// Seconds since simulated zero, for human-readable output.
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }
}
