//! Bounded mailbox
//!
//! A `Mailbox` is the FIFO buffer behind every subscription. Both ends are
//! non-blocking: `enqueue` either appends or reports that the mailbox is full
//! (the payload is then discarded), and `drain_all` hands back whatever is
//! buffered without waiting for more.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Capacity used when a subscription is created without an explicit one.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug)]
pub struct Mailbox<T> {
    capacity: usize,
    queue: Mutex<VecDeque<T>>,
}

impl<T> Mailbox<T> {
    /// Create an empty mailbox that holds at most `capacity` payloads.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Try to append `payload` at the tail.
    ///
    /// Returns `false` when the mailbox is full; the payload is dropped.
    pub fn enqueue(&self, payload: T) -> bool {
        let mut queue = self.lock();
        if queue.len() >= self.capacity {
            return false;
        }
        queue.push_back(payload);
        true
    }

    /// Remove and return every buffered payload in FIFO order.
    pub fn drain_all(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }

    /// Number of buffered payloads.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of payloads the mailbox holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // No operation panics while holding the lock, so a poisoned queue is still consistent.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
