//! Cache event subscribers
//!
//! Every strategy owns a [`ListenerBroadcast`] and reports three events
//! through it: a hit, a miss, and a put. Delivery is synchronous and in
//! registration order, and happens after the cache has finished mutating.
//! A subscriber error stops delivery to later subscribers and is returned to
//! the caller of the cache operation.
//!
//! Subscribers must not call back into the cache that notified them.

mod broadcast;
mod key_stats;
mod stats;

use std::sync::Arc;

pub use self::broadcast::ListenerBroadcast;
pub use self::key_stats::KeyStatsListener;
pub use self::stats::{ListenerStats, StatsListener};
use crate::error::ListenerError;

/// Result type returned by subscriber callbacks
pub type ListenerResult = Result<(), ListenerError>;

/// Subscriber to hit, miss and put events
///
/// All methods default to doing nothing, so a subscriber only implements the
/// events it cares about.
pub trait CacheListener<K, V>: Send + Sync {
    /// A lookup found `key`
    fn on_hit(&self, _key: &K) -> ListenerResult {
        Ok(())
    }

    /// A lookup did not find `key`
    fn on_miss(&self, _key: &K) -> ListenerResult {
        Ok(())
    }

    /// `key` was written with `value`
    fn on_put(&self, _key: &K, _value: &V) -> ListenerResult {
        Ok(())
    }
}

impl<K, V, T> CacheListener<K, V> for Arc<T>
where
    T: CacheListener<K, V> + ?Sized,
{
    fn on_hit(&self, key: &K) -> ListenerResult {
        (**self).on_hit(key)
    }

    fn on_miss(&self, key: &K) -> ListenerResult {
        (**self).on_miss(key)
    }

    fn on_put(&self, key: &K, value: &V) -> ListenerResult {
        (**self).on_put(key, value)
    }
}

impl<K, V, T> CacheListener<K, V> for Box<T>
where
    T: CacheListener<K, V> + ?Sized,
{
    fn on_hit(&self, key: &K) -> ListenerResult {
        (**self).on_hit(key)
    }

    fn on_miss(&self, key: &K) -> ListenerResult {
        (**self).on_miss(key)
    }

    fn on_put(&self, key: &K, value: &V) -> ListenerResult {
        (**self).on_put(key, value)
    }
}
