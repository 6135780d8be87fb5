//! `ImmediateQueue` — FIFO of callbacks with no associated time.
//!
//! A drain pass runs exactly the entries present when the pass began.  The
//! owner takes that length with [`pass_len`][ImmediateQueue::pass_len] and
//! pops that many; callbacks pushed mid-pass land behind them and wait for
//! the next pass.  Popping one at a time (rather than swapping the whole
//! deque out) means a callback that panics leaves the rest of its pass
//! still queued.

use std::collections::VecDeque;
use std::fmt;

/// Boxed immediate callback; runs at most once.
pub type ImmediateFn<C> = Box<dyn FnOnce(&mut C)>;

pub struct ImmediateQueue<C> {
    inner: VecDeque<ImmediateFn<C>>,
}

impl<C> ImmediateQueue<C> {
    pub fn new() -> Self {
        Self { inner: VecDeque::new() }
    }

    pub fn push(&mut self, callback: impl FnOnce(&mut C) + 'static) {
        self.inner.push_back(Box::new(callback));
    }

    /// Oldest queued callback.
    pub fn pop_front(&mut self) -> Option<ImmediateFn<C>> {
        self.inner.pop_front()
    }

    /// Number of callbacks a drain pass started now would run.
    #[inline]
    pub fn pass_len(&self) -> usize {
        self.inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<C> Default for ImmediateQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ImmediateQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmediateQueue")
            .field("len", &self.inner.len())
            .finish()
    }
}
