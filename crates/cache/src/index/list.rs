//! Arena-backed doubly linked list of cache entries
//!
//! Nodes live in a `Vec` and link to each other by slot index, so detaching
//! an arbitrary node or moving it to the front is `O(1)` without aliased
//! mutable pointers. Freed slots are recycled through a free list.
//!
//! Head is the most-recently-favored end, tail the next to evict.

use std::fmt;
use std::iter::FusedIterator;

use crate::entry::Entry;

/// Stable handle to a node in an [`OrderedList`]
///
/// A handle stays valid until its node is removed; after that the slot may
/// be reused and the handle must be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<K, V> {
    entry: Entry<K, V>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list of entries stored in an arena
pub struct OrderedList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> OrderedList<K, V> {
    /// Create an empty list
    pub const fn new() -> Self {
        Self { nodes: Vec::new(), free_list: Vec::new(), head: None, tail: None, len: 0 }
    }

    /// Number of linked entries
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no entries
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an entry at the head, returning its handle
    pub fn push_front(&mut self, entry: Entry<K, V>) -> NodeId {
        let node = Node { entry, prev: None, next: None };
        let index = if let Some(index) = self.free_list.pop() {
            self.nodes[index] = Some(node);
            index
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        };
        self.attach_front(index);
        self.len += 1;
        NodeId(index)
    }

    /// Detach and return the entry behind `id`
    ///
    /// Removing a vacant or out-of-range handle is a no-op.
    pub fn remove(&mut self, id: NodeId) -> Option<Entry<K, V>> {
        if !self.is_occupied(id.0) {
            return None;
        }
        self.detach(id.0);
        let node = self.nodes[id.0].take()?;
        self.free_list.push(id.0);
        self.len = self.len.saturating_sub(1);
        Some(node.entry)
    }

    /// Relink the node behind `id` at the head, keeping its entry
    ///
    /// Returns `false` if the handle is vacant.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.is_occupied(id.0) {
            return false;
        }
        if self.head != Some(id.0) {
            self.detach(id.0);
            self.attach_front(id.0);
        }
        true
    }

    /// Remove and return the tail entry
    pub fn pop_back(&mut self) -> Option<Entry<K, V>> {
        let tail = self.tail?;
        self.remove(NodeId(tail))
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Tail entry, the least valuable one
    pub fn peek_back(&self) -> Option<&Entry<K, V>> {
        self.tail.and_then(|index| self.get(NodeId(index)))
    }

    /// Entry behind `id`
    pub fn get(&self, id: NodeId) -> Option<&Entry<K, V>> {
        self.nodes.get(id.0).and_then(Option::as_ref).map(|node| &node.entry)
    }

    /// Mutable entry behind `id`
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Entry<K, V>> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut).map(|node| &mut node.entry)
    }

    /// Iterate entries from head to tail
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { list: self, current: self.head, remaining: self.len }
    }

    /// Iterate `(handle, entry)` pairs from head to tail
    pub fn iter_ids(&self) -> impl Iterator<Item = (NodeId, &Entry<K, V>)> + '_ {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let index = current?;
            let node = self.nodes.get(index).and_then(Option::as_ref)?;
            current = node.next;
            Some((NodeId(index), &node.entry))
        })
    }

    /// Walk the links and report the first structural inconsistency
    pub(crate) fn check_links(&self) -> Result<(), String> {
        let mut count = 0usize;
        let mut prev: Option<usize> = None;
        let mut current = self.head;
        while let Some(index) = current {
            let node = self
                .nodes
                .get(index)
                .and_then(Option::as_ref)
                .ok_or_else(|| format!("link to vacant slot {index}"))?;
            if node.prev != prev {
                return Err(format!("slot {index} has prev {:?}, expected {prev:?}", node.prev));
            }
            count += 1;
            if count > self.len {
                return Err(format!("walked past recorded length {}", self.len));
            }
            prev = Some(index);
            current = node.next;
        }
        if prev != self.tail {
            return Err(format!("walk ended at {prev:?}, tail is {:?}", self.tail));
        }
        if count != self.len {
            return Err(format!("walked {count} nodes, recorded length {}", self.len));
        }
        Ok(())
    }

    fn is_occupied(&self, index: usize) -> bool {
        matches!(self.nodes.get(index), Some(Some(_)))
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = match self.nodes.get(index).and_then(Option::as_ref) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_index) => {
                if let Some(prev_node) = self.nodes.get_mut(prev_index).and_then(Option::as_mut) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_index) => {
                if let Some(next_node) = self.nodes.get_mut(next_index).and_then(Option::as_mut) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes.get_mut(index).and_then(Option::as_mut) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index).and_then(Option::as_mut) {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_index) = self.head {
            if let Some(head_node) = self.nodes.get_mut(head_index).and_then(Option::as_mut) {
                head_node.prev = Some(index);
            }
        } else {
            self.tail = Some(index);
        }

        self.head = Some(index);
    }
}

impl<K, V> Default for OrderedList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for OrderedList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedList")
            .field("len", &self.len)
            .field("slots", &self.nodes.len())
            .field("free", &self.free_list.len())
            .finish()
    }
}

/// Iterator over entries from head to tail
pub struct Iter<'a, K, V> {
    list: &'a OrderedList<K, V>,
    current: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        let node = self.list.nodes.get(index).and_then(Option::as_ref)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    //! Unit tests for index::list.
    use std::time::Instant;

    use super::*;

    fn entry(key: &'static str) -> Entry<&'static str, u32> {
        Entry::new(key, 0, Instant::now())
    }

    fn keys(list: &OrderedList<&'static str, u32>) -> Vec<&'static str> {
        list.iter().map(|e| *e.key()).collect()
    }

    /// Validates `push_front` ordering.
    ///
    /// Assertions:
    /// - Confirms the newest entry is at the head and the oldest at the tail.
    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = OrderedList::new();
        list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.push_front(entry("c"));

        assert_eq!(keys(&list), vec!["c", "b", "a"]);
        assert_eq!(list.peek_back().map(|e| *e.key()), Some("a"));
        assert_eq!(list.iter().next().map(|e| *e.key()), Some("c"));
        assert!(list.check_links().is_ok());
    }

    /// Validates `remove` for head, middle and tail nodes.
    ///
    /// Assertions:
    /// - Confirms neighbors are relinked each time.
    /// - Confirms head and tail are cleared when the list empties.
    #[test]
    fn test_remove_relinks_neighbors() {
        let mut list = OrderedList::new();
        let a = list.push_front(entry("a"));
        let b = list.push_front(entry("b"));
        let c = list.push_front(entry("c"));
        let d = list.push_front(entry("d"));

        assert_eq!(list.remove(b).map(|e| *e.key()), Some("b"));
        assert_eq!(keys(&list), vec!["d", "c", "a"]);

        assert_eq!(list.remove(d).map(|e| *e.key()), Some("d"));
        assert_eq!(keys(&list), vec!["c", "a"]);

        assert_eq!(list.remove(a).map(|e| *e.key()), Some("a"));
        assert_eq!(keys(&list), vec!["c"]);
        assert_eq!(list.peek_back().map(|e| *e.key()), Some("c"));

        list.remove(c);
        assert!(list.is_empty());
        assert!(list.peek_back().is_none());
        assert!(list.iter().next().is_none());
        assert!(list.check_links().is_ok());
    }

    /// Validates that removing a vacant handle changes nothing.
    ///
    /// Assertions:
    /// - Confirms a second removal of the same handle returns `None`.
    /// - Confirms removal from an empty list returns `None`.
    #[test]
    fn test_remove_vacant_is_noop() {
        let mut list = OrderedList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));

        assert!(list.remove(a).is_some());
        assert!(list.remove(a).is_none());
        assert_eq!(list.len(), 1);

        let mut empty: OrderedList<&str, u32> = OrderedList::new();
        assert!(empty.pop_back().is_none());
        assert!(empty.remove(NodeId(3)).is_none());
    }

    /// Validates `move_to_front` preserves the entry and reorders links.
    ///
    /// Assertions:
    /// - Confirms the tail becomes the head.
    /// - Confirms moving the head is a no-op.
    #[test]
    fn test_move_to_front() {
        let mut list = OrderedList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));
        let c = list.push_front(entry("c"));

        assert!(list.move_to_front(a));
        assert_eq!(keys(&list), vec!["a", "c", "b"]);

        assert!(list.move_to_front(a));
        assert_eq!(keys(&list), vec!["a", "c", "b"]);

        assert!(list.move_to_front(c));
        assert_eq!(keys(&list), vec!["c", "a", "b"]);
        assert_eq!(list.len(), 3);
        assert!(list.check_links().is_ok());
    }

    /// Validates slot recycling after removals.
    ///
    /// Assertions:
    /// - Confirms a freed slot is reused by the next insert.
    /// - Confirms `pop_back` drains in insertion order.
    #[test]
    fn test_slots_are_recycled() {
        let mut list = OrderedList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.remove(a);
        let c = list.push_front(entry("c"));

        assert_eq!(c, a);
        assert_eq!(list.get(c).map(|e| *e.key()), Some("c"));

        assert_eq!(list.pop_back().map(|e| *e.key()), Some("b"));
        assert_eq!(list.pop_back().map(|e| *e.key()), Some("c"));
        assert!(list.pop_back().is_none());
    }

    /// Validates `clear` and the iterator size hint.
    ///
    /// Assertions:
    /// - Confirms the iterator reports the exact remaining count.
    /// - Confirms `clear` twice leaves an empty, consistent list.
    #[test]
    fn test_clear_and_iter_len() {
        let mut list = OrderedList::new();
        for key in ["a", "b", "c"] {
            list.push_front(entry(key));
        }
        assert_eq!(list.iter().len(), 3);
        assert_eq!(list.iter_ids().count(), 3);

        list.clear();
        list.clear();
        assert_eq!(list.len(), 0);
        assert!(list.check_links().is_ok());
    }
}
