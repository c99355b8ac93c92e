//! Fluent cache construction
//!
//! [`CacheBuilder`] collects the same settings as [`CacheOptions`] plus the
//! parts a document cannot carry: the clock and the initial subscribers.
//!
//! ```
//! use std::time::Duration;
//! use evictkit_cache::{Cache, CacheBuilder, StatsListener};
//!
//! let stats = StatsListener::new();
//! let mut cache = CacheBuilder::<String, u32>::new()
//!     .ttl(Duration::from_secs(30))
//!     .listener(stats.clone())
//!     .build()?;
//!
//! cache.put("a".into(), 1)?;
//! assert_eq!(stats.puts(), 1);
//! # Ok::<(), evictkit_cache::CacheError>(())
//! ```

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use evictkit_common::{Clock, SystemClock};
use tracing::info;

use crate::config::{CacheOptions, Strategy};
use crate::error::{CacheError, CacheResult};
use crate::listener::CacheListener;
use crate::policy::CapacityPolicy;
use crate::strategy::{Cache, ExpiringCache, FifoCache, LruCache};

/// Builder for a boxed [`Cache`]
pub struct CacheBuilder<K, V, C = SystemClock> {
    strategy: Option<Strategy>,
    capacity: Option<usize>,
    ttl: Option<Duration>,
    clock: C,
    listeners: Vec<Box<dyn CacheListener<K, V>>>,
}

impl<K, V> CacheBuilder<K, V> {
    /// Start with nothing configured and the system clock
    pub fn new() -> Self {
        Self {
            strategy: None,
            capacity: None,
            ttl: None,
            clock: SystemClock,
            listeners: Vec::new(),
        }
    }

    /// Start from validated options
    pub fn from_options(options: CacheOptions) -> Self {
        let builder = Self::new();
        match options {
            CacheOptions::Capacity { strategy, capacity } => {
                builder.strategy(strategy).capacity(capacity.get())
            }
            CacheOptions::Expiring { ttl } => builder.ttl(ttl),
        }
    }
}

impl<K, V, C> CacheBuilder<K, V, C> {
    /// Select a capacity-bounded strategy
    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Maximum number of entries for a capacity-bounded strategy
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Build a time-expiring cache with this time-to-live
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Read time from `clock` instead of the system clock
    pub fn clock<C2: Clock>(self, clock: C2) -> CacheBuilder<K, V, C2> {
        CacheBuilder {
            strategy: self.strategy,
            capacity: self.capacity,
            ttl: self.ttl,
            clock,
            listeners: self.listeners,
        }
    }

    /// Subscribe `listener` once the cache is built
    #[must_use]
    pub fn listener(mut self, listener: impl CacheListener<K, V> + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Validate the settings without building
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if a TTL is combined with a
    /// strategy or capacity, if a strategy is missing its capacity (or the
    /// reverse), or if a value is zero.
    pub fn options(&self) -> CacheResult<CacheOptions> {
        match (self.ttl, self.strategy, self.capacity) {
            (Some(ttl), None, None) => CacheOptions::ttl(ttl),
            (Some(_), _, _) => Err(CacheError::invalid_config(
                "ttl",
                "a time-expiring cache takes no strategy or capacity",
            )),
            (None, Some(strategy), Some(capacity)) => CacheOptions::capacity(strategy, capacity),
            (None, Some(_), None) => {
                Err(CacheError::invalid_config("capacity", "required for FIFO and LRU caches"))
            }
            (None, None, _) => Err(CacheError::invalid_config(
                "strategy",
                "set a strategy and capacity, or a ttl",
            )),
        }
    }
}

impl<K, V, C> CacheBuilder<K, V, C>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    C: Clock + 'static,
{
    /// Build the configured cache and register the listeners in order
    ///
    /// # Errors
    /// Same as [`CacheBuilder::options`].
    pub fn build(self) -> CacheResult<Box<dyn Cache<K, V>>> {
        let options = self.options()?;
        let mut cache: Box<dyn Cache<K, V>> = match options {
            CacheOptions::Capacity { strategy: Strategy::Fifo, capacity } => {
                Box::new(FifoCache::with_policy(CapacityPolicy::new(capacity), self.clock))
            }
            CacheOptions::Capacity { strategy: Strategy::Lru, capacity } => {
                Box::new(LruCache::with_policy(CapacityPolicy::new(capacity), self.clock))
            }
            CacheOptions::Expiring { ttl } => Box::new(ExpiringCache::with_clock(ttl, self.clock)?),
        };

        let listeners = self.listeners.len();
        for listener in self.listeners {
            cache.add_listener(listener);
        }
        info!(options = %options, listeners, "cache built");
        Ok(cache)
    }
}

impl<K, V> Default for CacheBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> fmt::Debug for CacheBuilder<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("strategy", &self.strategy)
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CacheOptions {
    /// Build a cache from these options on the system clock
    ///
    /// # Errors
    /// Options are validated on construction, so this only fails if they
    /// were assembled by hand with a zero TTL.
    pub fn build<K, V>(&self) -> CacheResult<Box<dyn Cache<K, V>>>
    where
        K: Eq + Hash + Clone + 'static,
        V: Clone + 'static,
    {
        CacheBuilder::from_options(*self).build()
    }
}
