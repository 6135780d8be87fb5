//! `tempo-queue` — the two queues a tempo scheduler owns.
//!
//! # Crate layout
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`event`]       | `Repeat`, `TimedEvent<C>`, `EventFn<C>`                |
//! | [`event_queue`] | `EventQueue<C>` (binary min-heap keyed by `(time, seq)`) |
//! | [`immediate`]   | `ImmediateQueue<C>` (FIFO), `ImmediateFn<C>`           |
//!
//! Both queues are generic over the context `C` their callbacks receive.
//! `tempo-sched` instantiates `C` with the scheduler itself so callbacks can
//! post further work.
//!
//! # Ordering (summary)
//!
//! ```text
//! pop order  = ascending time, then ascending insertion seq
//! repost     = pop → fire → into_next() → insert (fresh seq)
//! ```

pub mod event;
pub mod event_queue;
pub mod immediate;


pub use event::{EventFn, Repeat, TimedEvent};
pub use event_queue::EventQueue;
pub use immediate::{ImmediateFn, ImmediateQueue};
