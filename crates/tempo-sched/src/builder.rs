//! Configuration and fluent builder for constructing a [`Scheduler`].

use std::any::Any;
use std::rc::{Rc, Weak};

use tempo_core::{ClockConfig, SharedClock};

use crate::{DEFAULT_NAME, SchedError, SchedResult, Scheduler};

// ── SchedulerConfig ───────────────────────────────────────────────────────────

/// Top-level scheduler configuration.
///
/// Typically loaded from a JSON/TOML file by the application crate and passed
/// to [`SchedulerBuilder::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Name reported through [`Component`][crate::Component].  Must be
    /// non-blank.
    pub name: String,

    /// Start time and domain offsets for a scheduler-created clock.  Ignored
    /// when the builder is handed an existing clock.
    pub clock: ClockConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            name:  DEFAULT_NAME.to_owned(),
            clock: ClockConfig::default(),
        }
    }
}

// ── SchedulerBuilder ──────────────────────────────────────────────────────────

/// Fluent builder for [`Scheduler<SharedClock>`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                         |
/// |-----------------|-------------------------------------------------|
/// | `.name(s)`      | `config.name`                                   |
/// | `.clock(c)`     | New `SharedClock` from `config.clock`           |
/// | `.owner(rc)`    | No owner                                        |
///
/// # Example
///
/// ```rust,ignore
/// let clock = SharedClock::default();
/// let mut sched = SchedulerBuilder::new(SchedulerConfig::default())
///     .name("physics")
///     .clock(clock.clone())
///     .build()?;
/// sched.post(SimTime(10), |_| println!("tick"));
/// sched.run_until(SimTime(100));
/// ```
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    clock:  Option<SharedClock>,
    owner:  Option<Weak<dyn Any>>,
}

impl SchedulerBuilder {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            clock: None,
            owner: None,
        }
    }

    /// Override the configured name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Drive an existing, externally owned clock instead of creating one.
    ///
    /// Other holders of `clock` observe every time advance the scheduler
    /// makes.
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Record the owning context (held weakly).
    pub fn owner<O: Any>(mut self, owner: &Rc<O>) -> Self {
        let weak = Rc::downgrade(owner) as Weak<dyn Any>;
        self.owner = Some(weak);
        self
    }

    /// Validate the configuration and return a ready-to-run [`Scheduler`].
    pub fn build(self) -> SchedResult<Scheduler<SharedClock>> {
        if self.config.name.trim().is_empty() {
            return Err(SchedError::Config("scheduler name must not be blank".into()));
        }

        let clock = match self.clock {
            Some(c) => c,
            None => SharedClock::new(self.config.clock.make_clock()?),
        };

        let mut sched = Scheduler::with_name(self.config.name, clock);
        if let Some(owner) = self.owner {
            sched.set_owner_weak(owner);
        }
        Ok(sched)
    }
}
