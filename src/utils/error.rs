//! The `error` module defines the error types returned by the broker and the
//! router.
//!
//! Only structural failures are errors. A publish that finds a full mailbox is
//! not one: the delivery is dropped and logged, and the publisher carries on.

use thiserror::Error;

/// Failures of structural broker operations.
///
/// Neither variant has side effects: the broker state is left exactly as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// `subscribe` was called for a (topic, name) pair that is already registered.
    #[error("subscription to topic '{topic}' with name '{name}' already exists")]
    DuplicateSubscription { topic: String, name: String },

    /// `unsubscribe` was called for a (topic, name) pair that is not registered.
    #[error("subscription to topic '{topic}' with name '{name}' does not exist")]
    SubscriptionNotFound { topic: String, name: String },
}

/// Failures of the router's blocking queues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The queue's channel has no receiver or no sender left. A `MessageQueue`
    /// owns both ends, so this cannot happen while the queue is alive.
    #[error("queue '{queue}' is closed")]
    QueueClosed { queue: String },
}
