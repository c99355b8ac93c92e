//! Pluggable in-memory key/value caches.
//!
//! Three eviction strategies share one [`Cache`] contract:
//!
//! - [`FifoCache`]: evicts in insertion order.
//! - [`LruCache`]: evicts the least recently used key.
//! - [`ExpiringCache`]: drops entries a fixed time after their last use.
//!
//! Each strategy keeps its entries in an [`OrderedIndex`](index::OrderedIndex),
//! a hash map over an arena-backed doubly linked list, and asks a
//! [`StalePolicy`] whether the tail of that list should go. Hits, misses and
//! writes are broadcast to registered [`CacheListener`]s.
//!
//! # Quick start
//!
//! ```
//! use evictkit_cache::{Cache, CacheOptions, StatsListener};
//!
//! let options = CacheOptions::from_toml_str("strategy = \"LRU\"\ncapacity = 2")?;
//! let stats = StatsListener::new();
//!
//! let mut cache = options.build::<&str, u32>()?;
//! cache.add_listener(Box::new(stats.clone()));
//!
//! cache.put("a", 1)?;
//! cache.put("b", 2)?;
//! cache.get(&"a")?;
//! cache.put("c", 3)?;
//!
//! assert!(!cache.contains_key(&"b"));
//! assert_eq!(stats.hits(), 1);
//! # Ok::<(), evictkit_cache::CacheError>(())
//! ```
//!
//! # Single-threaded
//!
//! Caches take `&mut self` for every mutation and do no locking. Share one
//! across threads behind a mutex.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod config;
pub mod entry;
pub mod error;
pub mod file_cache;
pub mod index;
pub mod listener;
pub mod policy;
pub mod strategy;

pub use builder::CacheBuilder;
pub use config::{CacheOptions, Strategy};
pub use entry::Entry;
pub use error::{CacheError, CacheResult, ListenerError};
pub use file_cache::FileCache;
pub use listener::{
    CacheListener, KeyStatsListener, ListenerBroadcast, ListenerResult, ListenerStats,
    StatsListener,
};
pub use policy::{CapacityPolicy, ExpiryPolicy, NeverStale, StalePolicy};
pub use strategy::{Cache, ExpiringCache, FifoCache, LruCache};
