//! `tempo-sched` — the run loop of the tempo event scheduler.
//!
//! # Run loop
//!
//! ```text
//! run_until(target):
//!   ① Drain     — run every immediate callback queued right now (FIFO).
//!   ② Fire      — while the earliest timed event is due at or before target:
//!                   clock ← event.time
//!                   run its callback
//!                   cyclic with firings left → repost at time + cycle
//!                   drain immediate callbacks again
//!   ③ Settle    — clock ← target
//! ```
//!
//! Every other entry point (`run_for`, `run_secs`, `run_until_epoch`,
//! `run_until_mission`) converts its argument to a simulated-time target and
//! calls `run_until`.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `serde`   | Derives on `SchedulerConfig`, `RunStats`, time types.   |
//! | `fx-hash` | FxHash for the event queue's cancellation sets.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tempo_core::SimTime;
//! use tempo_sched::{Scheduler, SchedulerBuilder, SchedulerConfig};
//!
//! let mut sched = SchedulerBuilder::new(SchedulerConfig::default()).build()?;
//! sched.post_cyclic(SimTime(0), 10, Some(3), |s| println!("beat at {}", s.now()));
//! sched.post_immediate(|_| println!("first"));
//! let stats = sched.run_until(SimTime(100));
//! assert_eq!(stats.timed_fired, 3);
//! ```

pub mod builder;
pub mod component;
pub mod error;
pub mod scheduler;


pub use builder::{SchedulerBuilder, SchedulerConfig};
pub use component::Component;
pub use error::{SchedError, SchedResult};
pub use scheduler::{DEFAULT_NAME, RunStats, Scheduler};
