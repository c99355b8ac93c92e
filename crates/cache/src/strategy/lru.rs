//! Least-recently-used eviction

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Instant;

use evictkit_common::{Clock, SystemClock};

use super::engine::{Engine, Reorder};
use super::Cache;
use crate::entry::Entry;
use crate::error::CacheResult;
use crate::index::Iter;
use crate::listener::CacheListener;
use crate::policy::{CapacityPolicy, StalePolicy};

/// Cache that evicts the least recently used key
///
/// Every hit and every put moves the key to the head, so the tail is always
/// the key untouched for longest. The stale check runs before each lookup
/// and after each put.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use evictkit_cache::{Cache, LruCache};
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
/// cache.put("a", 1)?;
/// cache.put("b", 2)?;
/// cache.get(&"a")?;
/// cache.put("c", 3)?;
///
/// assert!(cache.contains_key(&"a"));
/// assert!(!cache.contains_key(&"b"));
/// # Ok::<(), evictkit_cache::CacheError>(())
/// ```
pub struct LruCache<K, V, P = CapacityPolicy, C = SystemClock> {
    engine: Engine<K, V, P, C>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_policy(CapacityPolicy::new(capacity), SystemClock)
    }
}

impl<K, V, P, C> LruCache<K, V, P, C>
where
    K: Eq + Hash + Clone,
    P: StalePolicy<K, V>,
    C: Clock,
{
    /// Create a cache with a custom stale policy and clock
    pub fn with_policy(policy: P, clock: C) -> Self {
        Self::named("lru", policy, clock)
    }

    pub(crate) fn named(name: &'static str, policy: P, clock: C) -> Self {
        Self { engine: Engine::new(name, Reorder::OnAccess, policy, clock) }
    }

    /// The stale policy in use
    pub const fn policy(&self) -> &P {
        self.engine.policy()
    }

    /// Value for `key` without reordering or events
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.engine.peek(key)
    }

    /// Entries from most to least recently used
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

    pub(crate) fn now(&self) -> Instant {
        self.engine.now()
    }

    pub(crate) fn entry(&self, key: &K) -> Option<&Entry<K, V>> {
        self.engine.index().get(key)
    }

    pub(crate) fn remove_where<F>(&mut self, predicate: F) -> Vec<Entry<K, V>>
    where
        F: FnMut(&Entry<K, V>) -> bool,
    {
        self.engine.index_mut().remove_where(predicate)
    }
}

impl<K, V, P, C> Cache<K, V> for LruCache<K, V, P, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    P: StalePolicy<K, V>,
    C: Clock,
{
    fn get(&mut self, key: &K) -> CacheResult<Option<V>> {
        let now = self.engine.now();
        self.engine.evict_stale(now);
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

impl<K, V, P: fmt::Debug, C> fmt::Debug for LruCache<K, V, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache").field("engine", &self.engine).finish()
    }
}
