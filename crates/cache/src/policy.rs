//! Stale-entry policies
//!
//! A [`StalePolicy`] is asked one question: should the current
//! least-valuable entry (the tail of the ordering list) be evicted? It sees
//! only the [`Candidate`] handed to it and its own configuration, never the
//! cache itself.
//!
//! Closures of the right shape are policies too:
//!
//! ```
//! use evictkit_cache::policy::{Candidate, StalePolicy};
//!
//! // Evict whenever a negative value reaches the tail
//! let policy = |candidate: &Candidate<'_, String, i64>| *candidate.entry.value() < 0;
//! # fn assert_policy<P: StalePolicy<String, i64>>(_: &P) {}
//! # assert_policy(&policy);
//! ```

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use crate::entry::Entry;

/// What a policy gets to look at when deciding on eviction
#[derive(Debug)]
pub struct Candidate<'a, K, V> {
    /// The least-valuable entry
    pub entry: &'a Entry<K, V>,
    /// Number of entries currently held, including `entry`
    pub len: usize,
    /// The instant the check runs at
    pub now: Instant,
}

/// Predicate deciding whether the least-valuable entry should go
pub trait StalePolicy<K, V> {
    /// Return `true` to evict `candidate.entry`
    fn should_evict(&self, candidate: &Candidate<'_, K, V>) -> bool;

    /// Short name used in log output
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<K, V, F> StalePolicy<K, V> for F
where
    F: Fn(&Candidate<'_, K, V>) -> bool,
{
    fn should_evict(&self, candidate: &Candidate<'_, K, V>) -> bool {
        self(candidate)
    }
}

/// Size trigger: evict once the cache holds more than `capacity` entries
///
/// The candidate's content is irrelevant. Because the check is a strict
/// `len > capacity` and runs once per operation, a cache that overshoots by
/// one loses exactly one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    capacity: NonZeroUsize,
}

impl CapacityPolicy {
    /// Create a policy allowing `capacity` entries
    pub const fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }

    /// The configured capacity
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl<K, V> StalePolicy<K, V> for CapacityPolicy {
    fn should_evict(&self, candidate: &Candidate<'_, K, V>) -> bool {
        candidate.len > self.capacity.get()
    }

    fn name(&self) -> &'static str {
        "capacity"
    }
}

/// Age trigger: evict once `now - touched_at >= ttl`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    ttl: Duration,
}

impl ExpiryPolicy {
    /// Create a policy with the given time-to-live
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// The configured time-to-live
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `entry` has outlived the TTL at `now`
    pub fn is_expired<K, V>(&self, entry: &Entry<K, V>, now: Instant) -> bool {
        entry.age(now) >= self.ttl
    }
}

impl<K, V> StalePolicy<K, V> for ExpiryPolicy {
    fn should_evict(&self, candidate: &Candidate<'_, K, V>) -> bool {
        self.is_expired(candidate.entry, candidate.now)
    }

    fn name(&self) -> &'static str {
        "expiry"
    }
}

/// Policy that never evicts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverStale;

impl<K, V> StalePolicy<K, V> for NeverStale {
    fn should_evict(&self, _candidate: &Candidate<'_, K, V>) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "never"
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for policy.
    use super::*;

    type TestEntry = Entry<&'static str, i32>;

    fn candidate(entry: &TestEntry, len: usize, now: Instant) -> Candidate<'_, &'static str, i32> {
        Candidate { entry, len, now }
    }

    /// Validates `CapacityPolicy` for the strict greater-than scenario.
    ///
    /// Assertions:
    /// - Ensures a full cache is kept.
    /// - Ensures a cache over capacity by one is trimmed.
    #[test]
    fn test_capacity_policy_is_strict() {
        let policy = CapacityPolicy::new(NonZeroUsize::new(2).unwrap());
        let now = Instant::now();
        let entry = Entry::new("a", 1, now);

        assert!(!policy.should_evict(&candidate(&entry, 2, now)));
        assert!(policy.should_evict(&candidate(&entry, 3, now)));
        assert_eq!(StalePolicy::<&str, i32>::name(&policy), "capacity");
    }

    /// Validates `ExpiryPolicy` at and around the TTL boundary.
    ///
    /// Assertions:
    /// - Ensures an entry younger than the TTL is kept.
    /// - Ensures an entry exactly TTL old is evicted.
    #[test]
    fn test_expiry_policy_boundary() {
        let policy = ExpiryPolicy::new(Duration::from_millis(100));
        let t0 = Instant::now();
        let entry = Entry::new("a", 1, t0);

        assert!(!policy.should_evict(&candidate(&entry, 1, t0 + Duration::from_millis(99))));
        assert!(policy.should_evict(&candidate(&entry, 1, t0 + Duration::from_millis(100))));
        assert!(policy.is_expired(&entry, t0 + Duration::from_millis(150)));
    }

    /// Validates closures and `NeverStale` as policies.
    ///
    /// Assertions:
    /// - Ensures the closure sees the candidate's value.
    /// - Ensures `NeverStale` keeps everything.
    #[test]
    fn test_closure_and_never_policies() {
        let now = Instant::now();
        let negative = Entry::new("neg", -1, now);
        let positive = Entry::new("pos", 1, now);
        let policy = |c: &Candidate<'_, &'static str, i32>| *c.entry.value() < 0;

        assert!(policy.should_evict(&candidate(&negative, 1, now)));
        assert!(!policy.should_evict(&candidate(&positive, 1, now)));
        assert!(!NeverStale.should_evict(&candidate(&negative, usize::MAX, now)));
    }
}
