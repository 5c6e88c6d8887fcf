//! Broker engine
//!
//! This module contains the in-memory broker responsible for:
//! - managing topics and their named subscriptions
//! - fanning a published payload out to every subscription of a topic
//!
//! Concurrency and usage notes:
//! - The broker is shared as `Arc<Broker>`; every method takes `&self`.
//! - The topic map sits behind a single `RwLock`. `publish` and the
//!   introspection methods take it shared, so publishes run in parallel with
//!   each other. `create_topic`, `delete_topic`, `subscribe` and
//!   `unsubscribe` take it exclusively.
//! - Nothing blocks on a consumer: a full mailbox drops the delivery.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::broker::mailbox::DEFAULT_CAPACITY;
use crate::broker::subscription::Subscription;
use crate::broker::topic::Topic;
use crate::config::BrokerSettings;
use crate::utils::error::BrokerError;

#[derive(Debug)]
pub struct Broker {
    topics: RwLock<HashMap<String, Topic>>,
    mailbox_capacity: usize,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker {
    /// Create a broker whose subscriptions get the default mailbox capacity.
    pub fn new() -> Self {
        Self::with_mailbox_capacity(DEFAULT_CAPACITY)
    }

    /// Create a broker whose subscriptions hold at most `mailbox_capacity` messages.
    pub fn with_mailbox_capacity(mailbox_capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            mailbox_capacity,
        }
    }

    /// Create a broker from the `[broker]` configuration section.
    pub fn from_settings(settings: &BrokerSettings) -> Self {
        Self::with_mailbox_capacity(settings.mailbox_capacity)
    }

    /// Mailbox capacity given to every new subscription.
    pub fn mailbox_capacity(&self) -> usize {
        self.mailbox_capacity
    }

    /// Create `topic` with no subscribers.
    ///
    /// Calling this for a topic that already exists replaces its subscriber
    /// map. Existing subscriptions are orphaned: they stop receiving
    /// publishes, but their handles can still pull what was buffered.
    pub fn create_topic(&self, topic: &str) {
        let previous = self.write().insert(topic.to_string(), Topic::new(topic));
        match previous {
            Some(old) if !old.is_empty() => {
                warn!(
                    topic,
                    orphaned = old.len(),
                    "topic re-created, existing subscriptions orphaned"
                );
            }
            _ => debug!(topic, "topic created"),
        }
    }

    /// Remove `topic` and all of its subscriptions. No-op for an absent topic.
    pub fn delete_topic(&self, topic: &str) {
        if let Some(old) = self.write().remove(topic) {
            debug!(topic, subscribers = old.len(), "topic deleted");
        }
    }

    /// Register a subscription named `name` under `topic`.
    ///
    /// An absent topic is created on the fly. Fails with
    /// [`BrokerError::DuplicateSubscription`] if the name is already taken in
    /// that topic; the broker does not hand out the existing handle.
    pub fn subscribe(&self, topic: &str, name: &str) -> Result<Arc<Subscription>, BrokerError> {
        let mut topics = self.write();
        let entry = topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic));
        let sub = entry.subscribe(name, self.mailbox_capacity)?;
        debug!(topic, subscriber = name, "subscribed");
        Ok(sub)
    }

    /// Remove the subscription `name` from `topic`.
    ///
    /// The removed mailbox is not drained; a caller-held handle keeps whatever
    /// was already delivered.
    pub fn unsubscribe(&self, topic: &str, name: &str) -> Result<(), BrokerError> {
        let mut topics = self.write();
        match topics.get_mut(topic) {
            Some(t) => {
                t.unsubscribe(name)?;
                debug!(topic, subscriber = name, "unsubscribed");
                Ok(())
            }
            None => Err(BrokerError::SubscriptionNotFound {
                topic: topic.to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Offer `payload` to every current subscriber of `topic`.
    ///
    /// Returns the number of subscriptions that accepted the payload. An
    /// absent topic or one without subscribers yields 0.
    pub fn publish(&self, topic: &str, payload: &str) -> usize {
        match self.read().get(topic) {
            Some(t) => t.publish(payload),
            None => 0,
        }
    }

    /// Whether `topic` currently exists.
    pub fn has_topic(&self, topic: &str) -> bool {
        self.read().contains_key(topic)
    }

    /// Names of all live topics, sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of subscriptions registered under `topic` (0 if absent).
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.read().get(topic).map_or(0, Topic::len)
    }

    // Writers never panic mid-mutation, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Topic>> {
        self.topics.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Topic>> {
        self.topics.write().unwrap_or_else(PoisonError::into_inner)
    }
}
