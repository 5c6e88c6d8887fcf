use crate::broker::mailbox::{DEFAULT_CAPACITY, Mailbox};

/// A named consumer handle registered under one topic.
///
/// The broker only ever enqueues into the mailbox; the holder of the handle
/// drains it with [`Subscription::pull`]. A handle outlives its registration:
/// after an unsubscribe it stops receiving publishes but anything already
/// buffered can still be pulled.
#[derive(Debug)]
pub struct Subscription {
    name: String,
    mailbox: Mailbox<String>,
}

impl Subscription {
    /// Create a subscription with a mailbox of the default capacity.
    pub fn new(name: &str) -> Self {
        Self::with_capacity(name, DEFAULT_CAPACITY)
    }

    /// Create a subscription whose mailbox holds at most `capacity` messages.
    pub fn with_capacity(name: &str, capacity: usize) -> Self {
        Self {
            name: name.to_string(),
            mailbox: Mailbox::new(capacity),
        }
    }

    /// Subscriber name, unique within its topic.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drain every message delivered since the last pull, oldest first.
    ///
    /// Concurrent pulls on the same handle race for the buffered messages.
    pub fn pull(&self) -> Vec<String> {
        self.mailbox.drain_all()
    }

    /// Number of messages waiting to be pulled.
    pub fn pending(&self) -> usize {
        self.mailbox.len()
    }

    /// Mailbox capacity of this subscription.
    pub fn capacity(&self) -> usize {
        self.mailbox.capacity()
    }

    pub(crate) fn deliver(&self, payload: String) -> bool {
        self.mailbox.enqueue(payload)
    }
}
