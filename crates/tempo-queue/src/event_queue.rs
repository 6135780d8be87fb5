//! `EventQueue` — time-ordered priority queue of timed events.
//!
//! A `BinaryHeap` of `Reverse<TimedEvent>` gives O(log n) insert and pop
//! with the earliest `(time, seq)` at the top.  Cancellation is lazy: a
//! cancelled id is moved from the live set to the tombstone set and its
//! heap entry is discarded when it surfaces.  The heap top is never a
//! tombstone, so `peek_min_time` stays `&self`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tempo_core::{EventId, SimTime};

use crate::TimedEvent;

#[cfg(feature = "fx-hash")]
type IdSet = rustc_hash::FxHashSet<EventId>;
#[cfg(not(feature = "fx-hash"))]
type IdSet = std::collections::HashSet<EventId>;

/// The live set of not-yet-fired timed events.
pub struct EventQueue<C> {
    heap:       BinaryHeap<Reverse<TimedEvent<C>>>,
    /// Ids present in `heap` and not cancelled.
    live:       IdSet,
    /// Ids present in `heap` but cancelled.
    tombstones: IdSet,
    next_seq:   u64,
}

impl<C> EventQueue<C> {
    pub fn new() -> Self {
        Self {
            heap:       BinaryHeap::new(),
            live:       IdSet::default(),
            tombstones: IdSet::default(),
            next_seq:   0,
        }
    }

    /// Add `event`, stamping it with the next insertion sequence number.
    ///
    /// Ids must be unique among pending events.
    pub fn insert(&mut self, mut event: TimedEvent<C>) {
        event.seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(event.id);
        self.heap.push(Reverse(event));
    }

    /// Smallest pending `time`, or `None` if no events are pending.
    pub fn peek_min_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|Reverse(e)| e.time)
    }

    /// Remove and return the earliest pending event.
    pub fn pop_min(&mut self) -> Option<TimedEvent<C>> {
        let Reverse(event) = self.heap.pop()?;
        self.live.remove(&event.id);
        self.purge_head();
        Some(event)
    }

    /// Withdraw a pending event.  Returns `false` if `id` is not pending.
    pub fn cancel(&mut self, id: EventId) -> bool {
        if !self.live.remove(&id) {
            return false;
        }
        self.tombstones.insert(id);
        self.purge_head();
        tracing::trace!(id = id.0, "timed event cancelled");
        true
    }

    /// `true` if `id` is pending (inserted, not fired, not cancelled).
    pub fn contains(&self, id: EventId) -> bool {
        self.live.contains(&id)
    }

    /// Number of pending events, excluding cancelled ones.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
        self.tombstones.clear();
    }

    /// Discard cancelled entries sitting at the top of the heap.
    fn purge_head(&mut self) {
        while let Some(Reverse(top)) = self.heap.peek() {
            if !self.tombstones.remove(&top.id) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl<C> Default for EventQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
