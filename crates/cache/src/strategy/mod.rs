//! Eviction strategies behind one contract
//!
//! | Strategy | Order of the list | Get reorders | Stale check |
//! |----------|-------------------|--------------|-------------|
//! | [`FifoCache`] | insertion | no | tail, after every put |
//! | [`LruCache`] | recency | yes | tail, before every get and after every put |
//! | [`ExpiringCache`] | recency | yes | full TTL sweep, before every get and put |
//!
//! All strategies are used through [`Cache`], either directly or as a
//! `Box<dyn Cache<K, V>>` produced by
//! [`CacheOptions::build`](crate::CacheOptions::build).

mod engine;
mod expiring;
mod fifo;
mod lru;

pub use self::expiring::ExpiringCache;
pub use self::fifo::FifoCache;
pub use self::lru::LruCache;
use crate::error::CacheResult;
use crate::listener::CacheListener;

/// Operations shared by every eviction strategy
///
/// `get` and `put` return `Err` only when a subscriber fails. By then the
/// cache has already applied the operation, including any eviction it
/// triggered.
pub trait Cache<K, V> {
    /// Look up `key`, reporting a hit or a miss
    ///
    /// # Errors
    /// Returns [`CacheError::Listener`](crate::CacheError::Listener) if a
    /// subscriber fails.
    fn get(&mut self, key: &K) -> CacheResult<Option<V>>;

    /// Insert or update `key`, evict if the policy says so, then report the
    /// write
    ///
    /// # Errors
    /// Returns [`CacheError::Listener`](crate::CacheError::Listener) if a
    /// subscriber fails.
    fn put(&mut self, key: K, value: V) -> CacheResult<()>;

    /// Remove `key`, returning its value if it was present
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Remove the least-valuable entry regardless of the policy
    fn evict_least_valuable(&mut self) -> Option<(K, V)>;

    /// Number of entries held
    ///
    /// Strategies that drop entries lazily count what they still hold, so
    /// this may include entries that lookups already treat as absent.
    fn len(&self) -> usize;

    /// Whether the cache holds nothing, counted the same way as [`len`](Self::len)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is held, without reordering or events
    fn contains_key(&self, key: &K) -> bool;

    /// Drop every entry
    fn clear_all(&mut self);

    /// The least-valuable entry, next in line for eviction
    fn peek_eldest(&self) -> Option<(&K, &V)>;

    /// Register a subscriber after those already registered
    fn add_listener(&mut self, listener: Box<dyn CacheListener<K, V>>);

    /// Short strategy name for logs
    fn strategy_name(&self) -> &'static str;
}
