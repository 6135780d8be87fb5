//! beacon — small end-to-end demo of the tempo event scheduler.
//!
//! Models a ground station listening to a spacecraft for a few seconds of
//! mission time:
//!
//! - a telemetry beacon every 2 s, forever;
//! - three attitude checks, 1.5 s apart, starting at mission T+1 s;
//! - an engine burn at mission T+5 s that cancels the attitude checks;
//! - packets arriving at seeded-random times, each acknowledged through an
//!   immediate event.
//!
//! The run is stepped one simulated second at a time.  Every fired event is
//! written to stdout as CSV; progress goes to the `tracing` log (set
//! `RUST_LOG=debug` for per-run detail).
//!
//! An optional first argument names a JSON `SchedulerConfig` file.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tempo_core::{MissionTime, Nanos, SharedClock, SimTime, TimeDomain};
use tempo_sched::{Component, Scheduler, SchedulerBuilder, SchedulerConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:         u64   = 42;
const SEC:          Nanos = 1_000_000_000;
const PACKET_COUNT: usize = 6;
const MISSION_SECS: i64   = 12;

const DEFAULT_CONFIG: &str = r#"{
    "name": "ground-station",
    "clock": {
        "start_sim_ns": 0,
        "epoch_origin_ns": 1700000000000000000,
        "mission_start_ns": 2000000000
    }
}"#;

// ── Trace output ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TraceRow {
    sim_ns:     i64,
    mission_ns: i64,
    event:      &'static str,
    detail:     String,
}

type Trace = Rc<RefCell<Vec<TraceRow>>>;

fn record(trace: &Trace, clock: &SharedClock, event: &'static str, detail: String) {
    trace.borrow_mut().push(TraceRow {
        sim_ns:     clock.now().0,
        mission_ns: clock.mission_now().0,
        event,
        detail,
    });
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // 1. Configuration.
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {path}"))?,
        None => DEFAULT_CONFIG.to_owned(),
    };
    let config: SchedulerConfig = serde_json::from_str(&raw).context("parsing scheduler config")?;

    // 2. Scheduler plus a reader handle on the clock it drives.
    let mut sched = SchedulerBuilder::new(config).build()?;
    let clock: SharedClock = sched.clock().clone();
    tracing::info!(scheduler = sched.name(), "scheduler ready at {}", clock.snapshot());

    let trace: Trace = Rc::new(RefCell::new(Vec::new()));

    // 3. Telemetry beacon: every 2 s, forever.
    {
        let (trace, clock) = (trace.clone(), clock.clone());
        let mut seq = 0u32;
        sched.post_cyclic(SimTime::ZERO, 2 * SEC, None, move |_: &mut Scheduler| {
            seq += 1;
            record(&trace, &clock, "beacon", format!("seq={seq}"));
        });
    }

    // 4. Attitude checks: three of them, unless the burn cancels the rest.
    let attitude = {
        let (trace, clock) = (trace.clone(), clock.clone());
        sched.post_cyclic_mission(MissionTime(SEC), SEC * 3 / 2, Some(3), move |_: &mut Scheduler| {
            record(&trace, &clock, "attitude", String::new());
        })
    };

    // 5. Engine burn at mission T+5 s.
    {
        let (trace, clock) = (trace.clone(), clock.clone());
        sched.post_mission(MissionTime(5 * SEC), move |s: &mut Scheduler| {
            let stopped = s.cancel(attitude);
            record(&trace, &clock, "burn", format!("attitude_cancelled={stopped}"));
        });
    }

    // 6. Packets at seeded-random offsets, acknowledged immediately.
    let mut rng = SmallRng::seed_from_u64(SEED);
    for n in 0..PACKET_COUNT {
        let offset_secs: f64 = rng.gen_range(0.0..(MISSION_SECS as f64));
        let (trace, clock) = (trace.clone(), clock.clone());
        sched.post_relative(offset_secs, move |s: &mut Scheduler| {
            record(&trace, &clock, "packet", format!("n={n}"));
            let (trace, clock) = (trace.clone(), clock.clone());
            s.post_immediate(move |_: &mut Scheduler| {
                record(&trace, &clock, "ack", format!("n={n}"));
            });
        });
    }

    // 7. Step through the mission one second at a time.
    let mut total = 0;
    let end = sched.clock().mission_to_sim(MissionTime(MISSION_SECS * SEC));
    while sched.now() < end {
        let stats = sched.run_for(SEC);
        total += stats.fired();
        tracing::debug!(%stats, "step");
    }
    tracing::info!(
        fired = total,
        pending = sched.pending_timed(),
        "mission window complete at {:.1} s",
        sched.now().as_secs_f64()
    );

    // 8. Emit the trace.
    let mut out = csv::Writer::from_writer(std::io::stdout().lock());
    for row in trace.borrow().iter() {
        out.serialize(row)?;
    }
    out.flush()?;

    Ok(())
}
