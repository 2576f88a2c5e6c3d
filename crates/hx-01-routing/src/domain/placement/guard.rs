//! Per-peer processing guards.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::domain::Timestamp;

/// Hashes of peers currently being placed.
///
/// A second notify for a hash already in the set is dropped, not queued.
#[derive(Debug, Default)]
pub struct InFlight {
    hashes: Mutex<HashSet<u64>>,
}

impl InFlight {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `hash`, or `None` if another caller holds it.
    pub fn try_acquire(&self, hash: u64) -> Option<InFlightGuard<'_>> {
        if self.hashes.lock().insert(hash) {
            Some(InFlightGuard { set: self, hash })
        } else {
            None
        }
    }

    /// Number of peers being placed right now.
    pub fn len(&self) -> usize {
        self.hashes.lock().len()
    }

    /// True when nothing is being placed.
    pub fn is_empty(&self) -> bool {
        self.hashes.lock().is_empty()
    }
}

/// Releases its hash on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    set: &'a InFlight,
    hash: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.hashes.lock().remove(&self.hash);
    }
}

/// Bounded, time-windowed memory of recently placed peers.
#[derive(Debug)]
pub struct RecentlyProcessed {
    retention_ms: u64,
    seen: Mutex<LruCache<u64, Timestamp>>,
}

impl RecentlyProcessed {
    /// Remember up to `capacity` peers for `retention_ms` each.
    pub fn new(retention_ms: u64, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            retention_ms,
            seen: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Whether `hash` was recorded less than the retention window before `now`.
    ///
    /// Expired records are dropped on lookup.
    pub fn is_recent(&self, hash: u64, now: Timestamp) -> bool {
        let mut seen = self.seen.lock();
        match seen.get(&hash) {
            Some(at) if now.millis_since(*at) < self.retention_ms => true,
            Some(_) => {
                seen.pop(&hash);
                false
            }
            None => false,
        }
    }

    /// Record that `hash` was placed at `now`.
    pub fn record(&self, hash: u64, now: Timestamp) {
        self.seen.lock().put(hash, now);
    }

    /// Number of records held, expired ones included.
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// True when nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}
