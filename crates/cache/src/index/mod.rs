//! Ordered index: hash lookup plus a doubly linked ordering list
//!
//! The map resolves a key to the [`NodeId`] of its node in the
//! [`OrderedList`]; both structures share handles rather than data, and
//! they always agree on membership and count. Every mutation keeps
//! `map.len() == list.len()`, which is asserted in debug builds.
//!
//! # Complexity
//! - `insert_front`, `remove`, `touch`, `pop_tail`, `get`, `peek_tail`:
//!   `O(1)` amortized.
//! - `clear`: `O(n)` due to drops.
//! - `remove_where`: `O(n)`.

mod list;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::Instant;

use evictkit_common::CommonError;

pub use self::list::{Iter, NodeId, OrderedList};
use crate::entry::Entry;
use crate::error::CacheResult;

/// Key lookup plus ordering list, kept in lockstep
pub struct OrderedIndex<K, V> {
    map: HashMap<K, NodeId>,
    list: OrderedList<K, V>,
}

impl<K, V> OrderedIndex<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty index
    pub fn new() -> Self {
        Self { map: HashMap::new(), list: OrderedList::new() }
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.debug_assert_in_sync();
        self.list.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is indexed
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert a new entry at the head
    ///
    /// # Errors
    /// Returns an internal error if the key is already indexed. Callers
    /// check for existence first, so this only fires on a defect.
    pub fn insert_front(&mut self, entry: Entry<K, V>) -> CacheResult<()> {
        if self.map.contains_key(entry.key()) {
            return Err(CommonError::internal("insert_front called for an indexed key").into());
        }
        let key = entry.key().clone();
        let id = self.list.push_front(entry);
        self.map.insert(key, id);
        self.debug_assert_in_sync();
        Ok(())
    }

    /// Entry for `key` without reordering
    pub fn get(&self, key: &K) -> Option<&Entry<K, V>> {
        self.map.get(key).and_then(|&id| self.list.get(id))
    }

    /// Mutable entry for `key` without reordering
    pub fn get_mut(&mut self, key: &K) -> Option<&mut Entry<K, V>> {
        let id = *self.map.get(key)?;
        self.list.get_mut(id)
    }

    /// Move the entry for `key` to the head and refresh its stamp
    pub fn touch(&mut self, key: &K, now: Instant) -> Option<&mut Entry<K, V>> {
        let id = *self.map.get(key)?;
        self.list.move_to_front(id);
        let entry = self.list.get_mut(id)?;
        entry.touch(now);
        Some(entry)
    }

    /// Remove the entry for `key`
    pub fn remove(&mut self, key: &K) -> Option<Entry<K, V>> {
        let id = self.map.remove(key)?;
        let entry = self.list.remove(id);
        self.debug_assert_in_sync();
        entry
    }

    /// Remove and return the tail entry
    pub fn pop_tail(&mut self) -> Option<Entry<K, V>> {
        let entry = self.list.pop_back()?;
        self.map.remove(entry.key());
        self.debug_assert_in_sync();
        Some(entry)
    }

    /// The tail entry, next in line for eviction
    pub fn peek_tail(&self) -> Option<&Entry<K, V>> {
        self.list.peek_back()
    }

    /// Remove every entry for which `predicate` holds, returning them in
    /// head-to-tail order
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<Entry<K, V>>
    where
        F: FnMut(&Entry<K, V>) -> bool,
    {
        let doomed: Vec<NodeId> = self
            .list
            .iter_ids()
            .filter(|(_, entry)| predicate(*entry))
            .map(|(id, _)| id)
            .collect();

        let mut removed = Vec::with_capacity(doomed.len());
        for id in doomed {
            if let Some(entry) = self.list.remove(id) {
                self.map.remove(entry.key());
                removed.push(entry);
            }
        }
        self.debug_assert_in_sync();
        removed
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    /// Iterate entries from head to tail
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Full consistency check between the map and the list
    ///
    /// # Errors
    /// Returns an internal error describing the first divergence found.
    pub fn verify(&self) -> CacheResult<()> {
        if self.map.len() != self.list.len() {
            return Err(CommonError::internal(format!(
                "index holds {} keys but list holds {} entries",
                self.map.len(),
                self.list.len()
            ))
            .into());
        }
        self.list.check_links().map_err(CommonError::internal)?;
        for (id, entry) in self.list.iter_ids() {
            if self.map.get(entry.key()) != Some(&id) {
                return Err(CommonError::internal("list entry missing from index").into());
            }
        }
        Ok(())
    }

    fn debug_assert_in_sync(&self) {
        debug_assert_eq!(self.map.len(), self.list.len(), "index and list diverged");
    }
}

impl<K, V> Default for OrderedIndex<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for OrderedIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedIndex")
            .field("len", &self.map.len())
            .field("list", &self.list)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for index.
    use std::time::Duration;

    use super::*;

    fn keys(index: &OrderedIndex<String, i32>) -> Vec<String> {
        index.iter().map(|e| e.key().clone()).collect()
    }

    fn filled(keys: &[&str]) -> OrderedIndex<String, i32> {
        let now = Instant::now();
        let mut index = OrderedIndex::new();
        for (i, key) in keys.iter().enumerate() {
            index.insert_front(Entry::new((*key).to_string(), i as i32, now)).unwrap();
        }
        index
    }

    /// Validates that a duplicate insert is rejected as an internal error.
    ///
    /// Assertions:
    /// - Confirms the error is reported and the size is unchanged.
    #[test]
    fn test_insert_duplicate_rejected() {
        let mut index = filled(&["a"]);
        let result = index.insert_front(Entry::new("a".to_string(), 9, Instant::now()));

        assert!(result.is_err());
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&"a".to_string()).map(|e| *e.value()), Some(0));
    }

    /// Validates `touch` moves the key to the head and restamps it.
    ///
    /// Assertions:
    /// - Confirms order after touching the tail.
    /// - Confirms the stamp equals the supplied instant.
    #[test]
    fn test_touch_moves_to_head() {
        let mut index = filled(&["a", "b", "c"]);
        let later = Instant::now() + Duration::from_secs(1);

        let touched = index.touch(&"a".to_string(), later).map(|e| e.touched_at());
        assert_eq!(touched, Some(later));
        assert_eq!(keys(&index), vec!["a", "c", "b"]);
        assert!(index.touch(&"zz".to_string(), later).is_none());
    }

    /// Validates `pop_tail` and `remove` keep the map and list in sync.
    ///
    /// Assertions:
    /// - Confirms `verify()` passes after each mutation.
    /// - Confirms removed keys no longer resolve.
    #[test]
    fn test_removals_keep_structures_in_sync() {
        let mut index = filled(&["a", "b", "c", "d"]);

        assert_eq!(index.pop_tail().map(|e| e.key().clone()), Some("a".to_string()));
        index.verify().unwrap();

        assert_eq!(index.remove(&"c".to_string()).map(|e| *e.value()), Some(2));
        index.verify().unwrap();
        assert!(!index.contains(&"c".to_string()));
        assert!(index.remove(&"c".to_string()).is_none());

        assert_eq!(keys(&index), vec!["d", "b"]);
        assert_eq!(index.len(), 2);
    }

    /// Validates `remove_where` removes every match, not only the tail.
    ///
    /// Assertions:
    /// - Confirms even-valued entries are removed from any position.
    #[test]
    fn test_remove_where_sweeps_all_matches() {
        let mut index = filled(&["a", "b", "c", "d", "e"]);

        let removed: Vec<i32> =
            index.remove_where(|e| e.value() % 2 == 0).iter().map(|e| *e.value()).collect();

        assert_eq!(removed, vec![4, 2, 0]);
        assert_eq!(keys(&index), vec!["d", "b"]);
        index.verify().unwrap();
    }

    /// Validates `clear` idempotence.
    ///
    /// Assertions:
    /// - Confirms the index is empty after two clears.
    #[test]
    fn test_clear_twice() {
        let mut index = filled(&["a", "b"]);
        index.clear();
        index.clear();
        assert!(index.is_empty());
        assert!(index.peek_tail().is_none());
        index.verify().unwrap();
    }
}
