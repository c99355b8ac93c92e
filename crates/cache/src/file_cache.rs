//! File contents cached by path
//!
//! [`FileCache`] maps a path to the full text of the file. A miss reads the
//! file and stores it, so later lookups of the same path are served from
//! memory until the entry is evicted.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::warn;

use crate::config::{CacheOptions, Strategy};
use crate::error::{CacheError, CacheResult};
use crate::listener::CacheListener;
use crate::strategy::Cache;

/// Path-to-contents cache over any strategy
///
/// # Examples
///
/// ```no_run
/// use evictkit_cache::{FileCache, Strategy};
///
/// let mut files = FileCache::with_capacity(Strategy::Lru, 16)?;
/// let motd = files.file_contents("/etc/motd")?;
/// # Ok::<(), evictkit_cache::CacheError>(())
/// ```
pub struct FileCache {
    cache: Box<dyn Cache<String, String>>,
}

impl FileCache {
    /// Cache up to `capacity` files, evicting per `strategy`
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if `capacity` is zero.
    pub fn with_capacity(strategy: Strategy, capacity: usize) -> CacheResult<Self> {
        Self::from_options(CacheOptions::capacity(strategy, capacity)?)
    }

    /// Cache files for `ttl` after their last use
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if `ttl` is zero.
    pub fn with_expiration(ttl: Duration) -> CacheResult<Self> {
        Self::from_options(CacheOptions::ttl(ttl)?)
    }

    /// Build the underlying cache from options
    ///
    /// # Errors
    /// Same as [`CacheOptions::build`].
    pub fn from_options(options: CacheOptions) -> CacheResult<Self> {
        Ok(Self::from_cache(options.build()?))
    }

    /// Wrap an already built cache
    pub fn from_cache(cache: Box<dyn Cache<String, String>>) -> Self {
        Self { cache }
    }

    /// Contents of the file at `path`, reading it on a miss
    ///
    /// # Errors
    /// Returns [`CacheError::Io`] if the file has to be read and cannot be,
    /// and [`CacheError::Listener`] if a subscriber fails.
    pub fn file_contents(&mut self, path: impl AsRef<Path>) -> CacheResult<String> {
        let path = path.as_ref();
        let key = path_key(path);
        if let Some(contents) = self.cache.get(&key)? {
            return Ok(contents);
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to read file for cache");
            CacheError::io(path, e)
        })?;
        self.cache.put(key, contents.clone())?;
        Ok(contents)
    }

    /// Store `contents` for `path` without touching the file system
    ///
    /// # Errors
    /// Returns [`CacheError::Listener`] if a subscriber fails.
    pub fn put_file_contents(
        &mut self,
        path: impl AsRef<Path>,
        contents: impl Into<String>,
    ) -> CacheResult<()> {
        self.cache.put(path_key(path.as_ref()), contents.into())
    }

    /// Register a subscriber on the underlying cache
    pub fn add_listener(&mut self, listener: Box<dyn CacheListener<String, String>>) {
        self.cache.add_listener(listener);
    }

    /// The underlying cache
    pub fn cache(&self) -> &dyn Cache<String, String> {
        self.cache.as_ref()
    }

    /// The underlying cache, mutably
    pub fn cache_mut(&mut self) -> &mut dyn Cache<String, String> {
        self.cache.as_mut()
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl fmt::Debug for FileCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCache")
            .field("strategy", &self.cache.strategy_name())
            .field("len", &self.cache.len())
            .finish()
    }
}
