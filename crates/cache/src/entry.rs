//! Cache entry with the metadata eviction decisions read

use std::time::{Duration, Instant};

/// A single key/value pair stored by a cache strategy
///
/// `touched_at` is refreshed whenever the strategy's reorder rule says the
/// entry was used: on every write for all strategies, and on read hits for
/// the recency-ordered ones. FIFO ignores it, LRU only uses the relative
/// order, and the time-expiring cache treats it as the expiry anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
    touched_at: Instant,
}

impl<K, V> Entry<K, V> {
    /// Create an entry stamped with `now`
    pub const fn new(key: K, value: V, now: Instant) -> Self {
        Self { key, value, touched_at: now }
    }

    /// The entry's key
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// The entry's current value
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// When the entry was inserted or last refreshed
    pub const fn touched_at(&self) -> Instant {
        self.touched_at
    }

    /// Time elapsed since the entry was last touched, zero if `now` is
    /// earlier than the stamp
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.touched_at)
    }

    /// Replace the value and refresh the stamp, returning the old value
    pub fn update(&mut self, value: V, now: Instant) -> V {
        self.touched_at = now;
        std::mem::replace(&mut self.value, value)
    }

    /// Refresh the stamp without changing the value
    pub fn touch(&mut self, now: Instant) {
        self.touched_at = now;
    }

    /// Split the entry into its key and value
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
