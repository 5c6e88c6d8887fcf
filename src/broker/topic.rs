//! Topic management
//!
//! A `Topic` maps subscriber names to their `Subscription` handles. At most
//! one subscription exists per name.
//!
//! Concurrency note: callers must synchronize access to `Topic` (the broker
//! holds every topic behind its read/write lock).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::broker::subscription::Subscription;
use crate::utils::error::BrokerError;

#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashMap<String, Arc<Subscription>>,
}

impl Topic {
    /// Create a new topic with the given name and no subscribers.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Register a new subscription named `name` with a mailbox of `capacity`.
    pub fn subscribe(
        &mut self,
        name: &str,
        capacity: usize,
    ) -> Result<Arc<Subscription>, BrokerError> {
        if self.subscribers.contains_key(name) {
            return Err(BrokerError::DuplicateSubscription {
                topic: self.name.clone(),
                name: name.to_string(),
            });
        }
        let sub = Arc::new(Subscription::with_capacity(name, capacity));
        self.subscribers.insert(name.to_string(), Arc::clone(&sub));
        Ok(sub)
    }

    /// Remove the subscription named `name`, returning its handle.
    pub fn unsubscribe(&mut self, name: &str) -> Result<Arc<Subscription>, BrokerError> {
        self.subscribers
            .remove(name)
            .ok_or_else(|| BrokerError::SubscriptionNotFound {
                topic: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// Offer `payload` to every subscriber. Returns how many accepted it.
    ///
    /// A full mailbox only loses this one delivery; the other subscribers are
    /// unaffected.
    pub fn publish(&self, payload: &str) -> usize {
        let mut delivered = 0;
        for sub in self.subscribers.values() {
            if sub.deliver(payload.to_string()) {
                delivered += 1;
            } else {
                warn!(
                    topic = %self.name,
                    subscriber = %sub.name(),
                    "subscription missed message (too many outstanding messages)"
                );
            }
        }
        delivered
    }

    /// Number of registered subscriptions.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether the topic has no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
