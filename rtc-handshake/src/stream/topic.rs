use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

use crate::stream::Subscription;

/// Fan-out bus for transient events.
///
/// Subscribers see every event published after they subscribed, in publish order. Nothing
/// is replayed to late subscribers. Each subscriber has its own unbounded queue, so a slow
/// reader never causes another reader to lose events, and a held but unread
/// [`Subscription`] keeps every event until it is dropped.
pub struct Topic<T> {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<T>>>,
}

impl<T: Clone> Topic<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        Subscription::new(rx)
    }

    /// Delivers `event` to every live subscriber and returns how many received it.
    ///
    /// The lock is held for the whole delivery so concurrent publishers cannot interleave
    /// differently for different subscribers.
    pub fn publish(&self, event: T) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<T>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}
