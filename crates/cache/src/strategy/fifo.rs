//! First-in-first-out eviction

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use evictkit_common::{Clock, SystemClock};

use super::engine::{Engine, Reorder};
use super::Cache;
use crate::error::CacheResult;
use crate::index::Iter;
use crate::listener::CacheListener;
use crate::policy::{CapacityPolicy, StalePolicy};

/// Cache that evicts in insertion order
///
/// Reads never reorder and updating an existing key keeps its position, so
/// the tail is always the oldest inserted key. The stale check runs once
/// after every put.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use evictkit_cache::{Cache, FifoCache};
///
/// let mut cache = FifoCache::new(NonZeroUsize::new(2).unwrap());
/// cache.put("a", 1)?;
/// cache.put("b", 2)?;
/// cache.put("c", 3)?;
///
/// assert_eq!(cache.get(&"a")?, None);
/// assert_eq!(cache.len(), 2);
/// # Ok::<(), evictkit_cache::CacheError>(())
/// ```
pub struct FifoCache<K, V, P = CapacityPolicy, C = SystemClock> {
    engine: Engine<K, V, P, C>,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_policy(CapacityPolicy::new(capacity), SystemClock)
    }
}

impl<K, V, P, C> FifoCache<K, V, P, C>
where
    K: Eq + Hash + Clone,
    P: StalePolicy<K, V>,
    C: Clock,
{
    /// Create a cache with a custom stale policy and clock
    pub fn with_policy(policy: P, clock: C) -> Self {
        Self { engine: Engine::new("fifo", Reorder::Never, policy, clock) }
    }

    /// The stale policy in use
    pub const fn policy(&self) -> &P {
        self.engine.policy()
    }

    /// Value for `key` without events
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.engine.peek(key)
    }

    /// Entries from newest to oldest
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.engine.iter()
    }

    /// Check that the lookup map and ordering list agree
    ///
    /// # Errors
    /// Returns an internal error describing the divergence.
    pub fn verify(&self) -> CacheResult<()> {
        self.engine.index().verify()
    }
}

impl<K, V, P, C> Cache<K, V> for FifoCache<K, V, P, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    P: StalePolicy<K, V>,
    C: Clock,
{
    fn get(&mut self, key: &K) -> CacheResult<Option<V>> {
        let now = self.engine.now();
        self.engine.read(key, now)
    }

    fn put(&mut self, key: K, value: V) -> CacheResult<()> {
        let now = self.engine.now();
        self.engine.write(key, value, now)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.engine.remove(key)
    }

    fn evict_least_valuable(&mut self) -> Option<(K, V)> {
        self.engine.evict_least_valuable()
    }

    fn len(&self) -> usize {
        self.engine.index().len()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.engine.index().contains(key)
    }

    fn clear_all(&mut self) {
        self.engine.clear();
    }

    fn peek_eldest(&self) -> Option<(&K, &V)> {
        self.engine.peek_eldest()
    }

    fn add_listener(&mut self, listener: Box<dyn CacheListener<K, V>>) {
        self.engine.subscribe(listener);
    }

    fn strategy_name(&self) -> &'static str {
        self.engine.name()
    }
}

impl<K, V, P: fmt::Debug, C> fmt::Debug for FifoCache<K, V, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCache").field("engine", &self.engine).finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for strategy::fifo.
    use super::*;

    fn fifo(capacity: usize) -> FifoCache<&'static str, i32> {
        FifoCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    fn keys(cache: &FifoCache<&'static str, i32>) -> Vec<&'static str> {
        cache.iter().map(|entry| *entry.key()).collect()
    }

    /// Validates insertion-order eviction.
    ///
    /// Assertions:
    /// - Confirms the first inserted key is evicted when capacity is exceeded.
    /// - Confirms the eldest entry is then the second key.
    #[test]
    fn test_evicts_first_inserted() {
        let mut cache = fifo(2);
        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        cache.put("c", 3).unwrap();

        assert_eq!(cache.get(&"a").unwrap(), None);
        assert_eq!(cache.peek_eldest(), Some((&"b", &2)));
        cache.verify().unwrap();
    }

    /// Validates that reads and updates never reorder.
    ///
    /// Assertions:
    /// - Confirms a read of the eldest key keeps it eldest.
    /// - Confirms an update changes the value in place.
    /// - Confirms the eldest key is still the one evicted next.
    #[test]
    fn test_get_and_update_do_not_reorder() {
        let mut cache = fifo(2);
        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();

        assert_eq!(cache.get(&"a").unwrap(), Some(1));
        cache.put("a", 10).unwrap();
        assert_eq!(keys(&cache), vec!["b", "a"]);

        cache.put("c", 3).unwrap();
        assert!(!cache.contains_key(&"a"));
        assert_eq!(keys(&cache), vec!["c", "b"]);
    }

    /// Validates key-based removal and explicit eviction.
    ///
    /// Assertions:
    /// - Confirms `remove` takes the named key from the middle.
    /// - Confirms removing an absent key changes nothing.
    /// - Confirms `evict_least_valuable` takes the oldest key.
    #[test]
    fn test_remove_and_evict_least_valuable() {
        let mut cache = fifo(5);
        for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
            cache.put(key, i as i32).unwrap();
        }

        assert_eq!(cache.remove(&"b"), Some(1));
        assert_eq!(cache.remove(&"b"), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.evict_least_valuable(), Some(("a", 0)));
        assert_eq!(keys(&cache), vec!["c"]);
        cache.verify().unwrap();
    }

    /// Validates `clear_all` idempotence.
    ///
    /// Assertions:
    /// - Confirms the size is zero after each of two clears.
    #[test]
    fn test_clear_all_twice() {
        let mut cache = fifo(3);
        cache.put("a", 1).unwrap();

        cache.clear_all();
        assert_eq!(cache.len(), 0);
        cache.clear_all();
        assert!(cache.is_empty());
        assert_eq!(cache.peek_eldest(), None);
        assert_eq!(cache.strategy_name(), "fifo");
    }
}
