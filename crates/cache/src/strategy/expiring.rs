//! Time-to-live eviction on top of recency ordering

use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use evictkit_common::{Clock, SystemClock};
use tracing::debug;

use super::{Cache, LruCache};
use crate::entry::Entry;
use crate::error::{CacheError, CacheResult};
use crate::index::Iter;
use crate::listener::CacheListener;
use crate::policy::{ExpiryPolicy, NeverStale};

/// Cache whose entries expire a fixed time after they were last touched
///
/// Ordering and reordering follow [`LruCache`]. Before every get and put the
/// whole cache is swept and every entry with `now - touched_at >= ttl` is
/// dropped, not just the tail. The sweep is `O(n)`.
///
/// `remove` and `evict_least_valuable` sweep first as well, so neither
/// hands back an expired entry. `len` and `is_empty` count entries held as
/// of the last sweep; lookups that skip the sweep (`contains_key`, `peek`,
/// `timestamp`) treat expired entries as absent.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use evictkit_cache::{Cache, ExpiringCache};
/// use evictkit_common::MockClock;
///
/// let clock = MockClock::new();
/// let mut cache = ExpiringCache::with_clock(Duration::from_millis(100), clock.clone())?;
/// cache.put("a", 1)?;
///
/// clock.advance(Duration::from_millis(150));
/// assert_eq!(cache.get(&"a")?, None);
/// # Ok::<(), evictkit_cache::CacheError>(())
/// ```
pub struct ExpiringCache<K, V, C = SystemClock> {
    inner: LruCache<K, V, NeverStale, C>,
    expiry: ExpiryPolicy,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache whose entries live for `ttl`
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if `ttl` is zero.
    pub fn new(ttl: Duration) -> CacheResult<Self> {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K, V, C> ExpiringCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Create a cache reading time from `clock`
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if `ttl` is zero.
    pub fn with_clock(ttl: Duration, clock: C) -> CacheResult<Self> {
        if ttl.is_zero() {
            return Err(CacheError::invalid_config("ttlMillis", "must be greater than zero"));
        }
        Ok(Self {
            inner: LruCache::named("expiring", NeverStale, clock),
            expiry: ExpiryPolicy::new(ttl),
        })
    }

    /// The configured time-to-live
    pub const fn ttl(&self) -> Duration {
        self.expiry.ttl()
    }

    /// When `key` was last touched, or `None` if it is absent or expired
    pub fn timestamp(&self, key: &K) -> Option<Instant> {
        self.live_entry(key).map(Entry::touched_at)
    }

    /// Value for `key` without reordering or events, `None` if expired
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.live_entry(key).map(Entry::value)
    }

    /// Drop every expired entry now, returning how many went
    pub fn purge_expired(&mut self) -> usize {
        let now = self.inner.now();
        let expiry = self.expiry;
        let removed = self.inner.remove_where(|entry| expiry.is_expired(entry, now)).len();
        if removed > 0 {
            debug!(
                strategy = "expiring",
                removed,
                remaining = self.inner.iter().len(),
                "swept expired entries"
            );
        }
        removed
    }

    /// Entries from most to least recently touched, expired ones included
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.inner.iter()
    }

    /// Check that the lookup map and ordering list agree
    ///
    /// # Errors
    /// Returns an internal error describing the divergence.
    pub fn verify(&self) -> CacheResult<()> {
        self.inner.verify()
    }

    fn live_entry(&self, key: &K) -> Option<&Entry<K, V>> {
        let now = self.inner.now();
        self.inner.entry(key).filter(|entry| !self.expiry.is_expired(entry, now))
    }
}

impl<K, V, C> Cache<K, V> for ExpiringCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    fn get(&mut self, key: &K) -> CacheResult<Option<V>> {
        self.purge_expired();
        self.inner.get(key)
    }

    fn put(&mut self, key: K, value: V) -> CacheResult<()> {
        self.purge_expired();
        self.inner.put(key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.purge_expired();
        self.inner.remove(key)
    }

    fn evict_least_valuable(&mut self) -> Option<(K, V)> {
        self.purge_expired();
        self.inner.evict_least_valuable()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.live_entry(key).is_some()
    }

    fn clear_all(&mut self) {
        self.inner.clear_all();
    }

    /// The least recently touched entry that has not expired
    fn peek_eldest(&self) -> Option<(&K, &V)> {
        let now = self.inner.now();
        self.inner
            .iter()
            .filter(|entry| !self.expiry.is_expired(entry, now))
            .last()
            .map(|entry| (entry.key(), entry.value()))
    }

    fn add_listener(&mut self, listener: Box<dyn CacheListener<K, V>>) {
        self.inner.add_listener(listener);
    }

    fn strategy_name(&self) -> &'static str {
        self.inner.strategy_name()
    }
}

impl<K, V, C> fmt::Debug for ExpiringCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("inner", &self.inner)
            .field("ttl", &self.expiry.ttl())
            .finish()
    }
}
