use serde::{Deserialize, Serialize};

/// What a [`ControlMessage`] does to the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteAction {
    /// Bind `route` to the queue named `queue_name`.
    Add,
    /// Drop the binding for `route`. The queue itself is left alone.
    Remove,
}

/// Changes the router's route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    pub action: RouteAction,
    pub route: String,
    pub queue_name: String,
}

/// A unit of content to forward along `route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub route: String,
    pub content: String,
}

impl ControlMessage {
    /// Bind `route` to the queue named `queue_name`.
    pub fn add(route: &str, queue_name: &str) -> Self {
        Self {
            action: RouteAction::Add,
            route: route.to_string(),
            queue_name: queue_name.to_string(),
        }
    }

    /// Drop the binding for `route`.
    pub fn remove(route: &str) -> Self {
        Self {
            action: RouteAction::Remove,
            route: route.to_string(),
            queue_name: String::new(),
        }
    }
}

impl Message {
    /// Content to forward along `route`.
    pub fn new(route: &str, content: &str) -> Self {
        Self {
            route: route.to_string(),
            content: content.to_string(),
        }
    }
}
