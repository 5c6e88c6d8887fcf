use tokio::sync::{Mutex, mpsc};

use crate::utils::error::RouterError;

/// A named, bounded queue with waiting semantics on both ends.
///
/// Several routes may share one queue, so it is handed around as
/// `Arc<MessageQueue>`.
#[derive(Debug)]
pub struct MessageQueue {
    name: String,
    sender: mpsc::Sender<String>,
    receiver: Mutex<mpsc::Receiver<String>>,
}

impl MessageQueue {
    /// Create an empty queue holding up to `capacity` messages (at least one).
    pub fn new(name: &str, capacity: usize) -> Self {
        // tokio's bounded channel rejects a zero capacity
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            name: name.to_string(),
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Queue name, used to share one queue between routes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append `content`, waiting while the queue is full.
    ///
    /// The queue holds its own receiver, so this only fails if that invariant breaks.
    pub async fn enqueue(&self, content: String) -> Result<(), RouterError> {
        self.sender
            .send(content)
            .await
            .map_err(|_| RouterError::QueueClosed {
                queue: self.name.clone(),
            })
    }

    /// Take the oldest message, waiting until one is available.
    pub async fn dequeue(&self) -> Result<String, RouterError> {
        self.receiver
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| RouterError::QueueClosed {
                queue: self.name.clone(),
            })
    }

    /// Number of messages currently buffered.
    pub fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
