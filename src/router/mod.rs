//! The `router` module forwards each message to exactly one named queue.
//!
//! A mutable route table maps route keys to queues; control messages add or
//! remove bindings at runtime. Messages whose route is not bound end up in a
//! dedicated fallback queue.
//!
//! Unlike the broker's mailboxes, router queues apply backpressure: enqueueing
//! into a full queue waits for room and dequeueing waits for a message.

pub mod engine;
pub mod message;
pub mod queue;

pub use engine::DynamicRouter;
pub use message::{ControlMessage, Message, RouteAction};
pub use queue::MessageQueue;
