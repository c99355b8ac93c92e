//! Per-key hit, miss and put counters

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{CacheListener, ListenerResult};

#[derive(Debug)]
struct KeyCounts<K> {
    hits: HashMap<K, u64>,
    misses: HashMap<K, u64>,
    puts: HashMap<K, u64>,
}

impl<K> Default for KeyCounts<K> {
    fn default() -> Self {
        Self { hits: HashMap::new(), misses: HashMap::new(), puts: HashMap::new() }
    }
}

/// Subscriber counting events per key
///
/// Like [`StatsListener`](super::StatsListener), clones share state and
/// separate instances never do.
#[derive(Debug)]
pub struct KeyStatsListener<K> {
    counts: Arc<Mutex<KeyCounts<K>>>,
}

impl<K> KeyStatsListener<K>
where
    K: Eq + Hash + Clone + Ord,
{
    /// Create a listener that has seen nothing
    pub fn new() -> Self {
        Self { counts: Arc::new(Mutex::new(KeyCounts::default())) }
    }

    /// Hits recorded for `key`, zero if never seen
    pub fn key_hits(&self, key: &K) -> u64 {
        self.counts.lock().hits.get(key).copied().unwrap_or(0)
    }

    /// Misses recorded for `key`, zero if never seen
    pub fn key_misses(&self, key: &K) -> u64 {
        self.counts.lock().misses.get(key).copied().unwrap_or(0)
    }

    /// Puts recorded for `key`, zero if never seen
    pub fn key_puts(&self, key: &K) -> u64 {
        self.counts.lock().puts.get(key).copied().unwrap_or(0)
    }

    /// Up to `n` keys with the most hits
    pub fn top_hit_keys(&self, n: usize) -> Vec<(K, u64)> {
        top_n(&self.counts.lock().hits, n)
    }

    /// Up to `n` keys with the most misses
    pub fn top_missed_keys(&self, n: usize) -> Vec<(K, u64)> {
        top_n(&self.counts.lock().misses, n)
    }

    /// Up to `n` keys with the most puts
    pub fn top_put_keys(&self, n: usize) -> Vec<(K, u64)> {
        top_n(&self.counts.lock().puts, n)
    }

    /// Forget everything recorded so far
    pub fn reset(&self) {
        *self.counts.lock() = KeyCounts::default();
    }
}

/// Sorted by descending count, ties by ascending key
fn top_n<K: Clone + Ord>(counts: &HashMap<K, u64>, n: usize) -> Vec<(K, u64)> {
    let mut ranked: Vec<(K, u64)> = counts.iter().map(|(k, &c)| (k.clone(), c)).collect();
    ranked.sort_unstable_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
    ranked.truncate(n);
    ranked
}

fn bump<K: Eq + Hash + Clone>(counts: &mut HashMap<K, u64>, key: &K) {
    if let Some(count) = counts.get_mut(key) {
        *count += 1;
    } else {
        counts.insert(key.clone(), 1);
    }
}

impl<K> Clone for KeyStatsListener<K> {
    fn clone(&self) -> Self {
        Self { counts: Arc::clone(&self.counts) }
    }
}

impl<K> Default for KeyStatsListener<K>
where
    K: Eq + Hash + Clone + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheListener<K, V> for KeyStatsListener<K>
where
    K: Eq + Hash + Clone + Ord + Send,
{
    fn on_hit(&self, key: &K) -> ListenerResult {
        bump(&mut self.counts.lock().hits, key);
        Ok(())
    }

    fn on_miss(&self, key: &K) -> ListenerResult {
        bump(&mut self.counts.lock().misses, key);
        Ok(())
    }

    fn on_put(&self, key: &K, _value: &V) -> ListenerResult {
        bump(&mut self.counts.lock().puts, key);
        Ok(())
    }
}
