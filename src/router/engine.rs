//! Router engine
//!
//! `DynamicRouter` owns the route table and the fallback queue. Route
//! bindings are many-to-one: several routes may point at the same queue, which
//! is looked up by name among the queues currently bound.
//!
//! The table is guarded by a `RwLock` held only for the lookup or the update.
//! Forwarding clones the target queue handle first and awaits the enqueue
//! after the lock is released, so a full queue never stalls control messages.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::config::RouterSettings;
use crate::router::message::{ControlMessage, Message, RouteAction};
use crate::router::queue::MessageQueue;
use crate::utils::error::RouterError;

#[derive(Debug)]
pub struct DynamicRouter {
    unknown_queue: Arc<MessageQueue>,
    route_table: RwLock<HashMap<String, Arc<MessageQueue>>>,
    queue_capacity: usize,
}

impl Default for DynamicRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicRouter {
    /// Create a router with the default queue capacity and `/unknown` fallback queue.
    pub fn new() -> Self {
        Self::from_settings(&RouterSettings::default())
    }

    /// Create a router from the `[router]` configuration section.
    pub fn from_settings(settings: &RouterSettings) -> Self {
        Self {
            unknown_queue: Arc::new(MessageQueue::new(
                &settings.unknown_queue_name,
                settings.queue_capacity,
            )),
            route_table: RwLock::new(HashMap::new()),
            queue_capacity: settings.queue_capacity,
        }
    }

    /// The queue that receives messages for routes with no binding.
    pub fn unknown_queue(&self) -> &Arc<MessageQueue> {
        &self.unknown_queue
    }

    /// Forward `msg.content` to the queue bound to `msg.route`, or to the
    /// unknown queue. Waits while the target queue is full.
    pub async fn handle_message(&self, msg: &Message) -> Result<(), RouterError> {
        let target = self
            .read()
            .get(&msg.route)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.unknown_queue));
        debug!(route = %msg.route, queue = %target.name(), "forwarding message");
        target.enqueue(msg.content.clone()).await
    }

    /// Apply an add or remove to the route table.
    ///
    /// Adding a route that already exists is ignored, even if it names a
    /// different queue. Removing only drops the binding.
    pub fn handle_control_message(&self, msg: &ControlMessage) {
        let mut table = self.write();
        match msg.action {
            RouteAction::Remove => {
                if table.remove(&msg.route).is_some() {
                    debug!(route = %msg.route, "route removed");
                }
            }
            RouteAction::Add => {
                if table.contains_key(&msg.route) {
                    return;
                }
                let queue = find_in(&table, &msg.queue_name).unwrap_or_else(|| {
                    Arc::new(MessageQueue::new(&msg.queue_name, self.queue_capacity))
                });
                debug!(route = %msg.route, queue = %msg.queue_name, "route added");
                table.insert(msg.route.clone(), queue);
            }
        }
    }

    /// Look up a bound queue by name. Queues no route points at are not found.
    pub fn find_queue(&self, name: &str) -> Option<Arc<MessageQueue>> {
        find_in(&self.read(), name)
    }

    /// Bound route keys, sorted.
    pub fn routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = self.read().keys().cloned().collect();
        routes.sort();
        routes
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<MessageQueue>>> {
        self.route_table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<MessageQueue>>> {
        self.route_table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_in(
    table: &HashMap<String, Arc<MessageQueue>>,
    name: &str,
) -> Option<Arc<MessageQueue>> {
    table.values().find(|q| q.name() == name).cloned()
}
