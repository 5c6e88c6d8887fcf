//! # Mailroom
//!
//! `mailroom` provides in-process messaging primitives for handing work and
//! notifications to concurrent consumers.
//!
//! ## Core Modules
//!
//! - `broker`: topic based publish/subscribe with bounded, drop-on-full mailboxes.
//! - `router`: a dynamic content router that forwards each message to the queue
//!   bound to its route, or to a fallback queue for unknown routes.
//! - `config`: Handles loading and managing configuration.
//! - `utils`: Shared utilities such as error types and logging setup.

pub mod broker;
pub mod config;
pub mod router;
pub mod utils;

pub use broker::{Broker, Mailbox, Subscription};
pub use router::DynamicRouter;
pub use utils::error::{BrokerError, RouterError};
