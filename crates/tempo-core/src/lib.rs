//! `tempo-core` — foundational types for the `tempo` event scheduler.
//!
//! This crate is a dependency of every other `tempo-*` crate.  It has no
//! `tempo-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`time`]    | `SimTime`, `MissionTime`, `EpochTime`, `secs_to_nanos`      |
//! | [`clock`]   | `TimeDomain`, `SimClock`, `SharedClock`, `ClockConfig`      |
//! | [`ids`]     | `EventId`, `EventIdGen`                                     |
//! | [`error`]   | `TempoError`, `TempoResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to time and config types.   |

pub mod clock;
pub mod error;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::{ClockConfig, SharedClock, SimClock, TimeDomain};
pub use error::{TempoError, TempoResult};
pub use ids::{EventId, EventIdGen};
pub use time::{EpochTime, MissionTime, NANOS_PER_SEC, Nanos, SimTime, secs_to_nanos};
