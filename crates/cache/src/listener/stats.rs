//! Aggregate hit, miss and put counters

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{CacheListener, ListenerResult};

/// Point-in-time copy of a [`StatsListener`]'s counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Writes
    pub puts: u64,
}

impl ListenerStats {
    /// Hits divided by total lookups, or 0.0 with no lookups
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Hits plus misses
    pub const fn total_lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Subscriber counting every event it receives
///
/// Counters belong to the instance. Clones share them, so one handle can be
/// registered with a cache while another is kept for queries; separately
/// constructed listeners never share counts.
///
/// # Examples
///
/// ```
/// use evictkit_cache::{Cache, CacheOptions, StatsListener, Strategy};
///
/// let stats = StatsListener::new();
/// let mut cache = CacheOptions::capacity(Strategy::Lru, 8)?.build::<String, u32>()?;
/// cache.add_listener(Box::new(stats.clone()));
///
/// cache.put("a".into(), 1)?;
/// cache.get(&"a".into())?;
/// cache.get(&"b".into())?;
///
/// assert_eq!((stats.hits(), stats.misses(), stats.puts()), (1, 1, 1));
/// # Ok::<(), evictkit_cache::CacheError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatsListener {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    puts: Arc<AtomicU64>,
}

impl StatsListener {
    /// Create a listener with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hits seen
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of misses seen
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of puts seen
    pub fn puts(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }

    /// Hit rate over all lookups seen
    pub fn hit_rate(&self) -> f64 {
        self.snapshot().hit_rate()
    }

    /// Copy the current counters
    pub fn snapshot(&self) -> ListenerStats {
        ListenerStats { hits: self.hits(), misses: self.misses(), puts: self.puts() }
    }

    /// Reset every counter to zero
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.puts.store(0, Ordering::Relaxed);
    }
}

impl<K, V> CacheListener<K, V> for StatsListener {
    fn on_hit(&self, _key: &K) -> ListenerResult {
        self.hits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_miss(&self, _key: &K) -> ListenerResult {
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_put(&self, _key: &K, _value: &V) -> ListenerResult {
        self.puts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
