//! Fan-out of one cache event to many subscribers

use std::fmt;

use tracing::warn;

use super::{CacheListener, ListenerResult};

/// Ordered set of subscribers that receive every event
///
/// The broadcast is itself a [`CacheListener`], so broadcasts nest.
pub struct ListenerBroadcast<K, V> {
    listeners: Vec<Box<dyn CacheListener<K, V>>>,
}

impl<K, V> ListenerBroadcast<K, V> {
    /// Create a broadcast with no subscribers
    pub fn new() -> Self {
        Self { listeners: Vec::new() }
    }

    /// Append a subscriber; it receives events after those already added
    pub fn subscribe(&mut self, listener: Box<dyn CacheListener<K, V>>) {
        self.listeners.push(listener);
    }

    /// Number of subscribers
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn deliver<F>(&self, event: &'static str, mut call: F) -> ListenerResult
    where
        F: FnMut(&dyn CacheListener<K, V>) -> ListenerResult,
    {
        for (position, listener) in self.listeners.iter().enumerate() {
            if let Err(err) = call(&**listener) {
                warn!(event, position, error = %err, "cache listener failed");
                return Err(err);
            }
        }
        Ok(())
    }
}

impl<K, V> CacheListener<K, V> for ListenerBroadcast<K, V> {
    fn on_hit(&self, key: &K) -> ListenerResult {
        self.deliver("hit", |listener| listener.on_hit(key))
    }

    fn on_miss(&self, key: &K) -> ListenerResult {
        self.deliver("miss", |listener| listener.on_miss(key))
    }

    fn on_put(&self, key: &K, value: &V) -> ListenerResult {
        self.deliver("put", |listener| listener.on_put(key, value))
    }
}

impl<K, V> Default for ListenerBroadcast<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ListenerBroadcast<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerBroadcast").field("listeners", &self.listeners.len()).finish()
    }
}
