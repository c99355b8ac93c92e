//! State and mutation steps shared by every strategy
//!
//! A strategy is an [`Engine`] plus a reorder rule. Every public operation
//! follows the same sequence: mutate the index, run the stale check, then
//! notify subscribers. A subscriber error therefore never leaves the index
//! half-updated.

use std::fmt;
use std::hash::Hash;
use std::time::Instant;

use evictkit_common::Clock;
use tracing::{debug, trace};

use crate::entry::Entry;
use crate::error::CacheResult;
use crate::index::{Iter, OrderedIndex};
use crate::listener::{CacheListener, ListenerBroadcast};
use crate::policy::{Candidate, StalePolicy};

/// Whether a touch moves the entry to the head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reorder {
    /// Insertion order only
    Never,
    /// Every get and put moves the key to the head
    OnAccess,
}

pub(crate) struct Engine<K, V, P, C> {
    name: &'static str,
    reorder: Reorder,
    index: OrderedIndex<K, V>,
    policy: P,
    clock: C,
    listeners: ListenerBroadcast<K, V>,
}

impl<K, V, P, C> Engine<K, V, P, C>
where
    K: Eq + Hash + Clone,
    P: StalePolicy<K, V>,
    C: Clock,
{
    pub(crate) fn new(name: &'static str, reorder: Reorder, policy: P, clock: C) -> Self {
        Self {
            name,
            reorder,
            index: OrderedIndex::new(),
            policy,
            clock,
            listeners: ListenerBroadcast::new(),
        }
    }

    pub(crate) const fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }

    pub(crate) const fn policy(&self) -> &P {
        &self.policy
    }

    pub(crate) const fn index(&self) -> &OrderedIndex<K, V> {
        &self.index
    }

    pub(crate) fn index_mut(&mut self) -> &mut OrderedIndex<K, V> {
        &mut self.index
    }

    pub(crate) fn subscribe(&mut self, listener: Box<dyn CacheListener<K, V>>) {
        self.listeners.subscribe(listener);
    }

    /// Ask the policy about the tail once and evict it if told to
    pub(crate) fn evict_stale(&mut self, now: Instant) -> Option<Entry<K, V>> {
        let len = self.index.len();
        let tail = self.index.peek_tail()?;
        if !self.policy.should_evict(&Candidate { entry: tail, len, now }) {
            return None;
        }
        let evicted = self.index.pop_tail();
        debug!(
            strategy = self.name,
            policy = self.policy.name(),
            remaining = self.index.len(),
            "evicted least valuable entry"
        );
        evicted
    }

    /// Look up `key`, reordering per the strategy, and report hit or miss
    pub(crate) fn read(&mut self, key: &K, now: Instant) -> CacheResult<Option<V>>
    where
        V: Clone,
    {
        let found = match self.reorder {
            Reorder::OnAccess => self.index.touch(key, now).map(|entry| entry.value().clone()),
            Reorder::Never => self.index.get(key).map(|entry| entry.value().clone()),
        };

        if found.is_some() {
            trace!(strategy = self.name, "cache hit");
            self.listeners.on_hit(key)?;
        } else {
            trace!(strategy = self.name, "cache miss");
            self.listeners.on_miss(key)?;
        }
        Ok(found)
    }

    /// Insert or update `key`, run the stale check, then report the put
    pub(crate) fn write(&mut self, key: K, value: V, now: Instant) -> CacheResult<()> {
        let existing = match self.reorder {
            Reorder::OnAccess => self.index.touch(&key, now),
            Reorder::Never => self.index.get_mut(&key),
        };
        match existing {
            Some(entry) => {
                entry.update(value, now);
            }
            None => self.index.insert_front(Entry::new(key.clone(), value, now))?,
        }

        let evicted = self.evict_stale(now);
        // A custom policy may evict the entry that was just written
        let written = self
            .index
            .get(&key)
            .or_else(|| evicted.as_ref().filter(|entry| *entry.key() == key));
        if let Some(entry) = written {
            self.listeners.on_put(&key, entry.value())?;
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        self.index.remove(key).map(|entry| entry.into_pair().1)
    }

    pub(crate) fn evict_least_valuable(&mut self) -> Option<(K, V)> {
        let evicted = self.index.pop_tail()?;
        debug!(strategy = self.name, remaining = self.index.len(), "evicted on request");
        Some(evicted.into_pair())
    }

    pub(crate) fn peek(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(Entry::value)
    }

    pub(crate) fn peek_eldest(&self) -> Option<(&K, &V)> {
        self.index.peek_tail().map(|entry| (entry.key(), entry.value()))
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        self.index.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
        debug!(strategy = self.name, "cache cleared");
    }
}

impl<K, V, P, C> fmt::Debug for Engine<K, V, P, C>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .field("reorder", &self.reorder)
            .field("index", &self.index)
            .field("policy", &self.policy)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
