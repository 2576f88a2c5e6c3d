use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::domain::{LivenessConfig, MetaValue, RoutingTableEntry, SlotMut};

use super::{Admission, Candidate, SlotSelector};

/// Metadata key under which the keep-alive subsystem stores liveness scores.
pub const LIVENESS_KEY: &str = "liveness";

/// Liveness score of `entry`, or the configured initial score if none was
/// recorded yet.
pub fn entry_liveness(entry: &RoutingTableEntry, config: &LivenessConfig) -> f64 {
    entry
        .get_data(LIVENESS_KEY)
        .and_then(MetaValue::as_f64)
        .unwrap_or(config.initial)
}

/// Liveness-biased selector.
///
/// A full slot's least live member is replaced only when its score is at or
/// below `threshold` and strictly below the candidate's. Scores of evicted
/// peers are remembered so a flapping peer does not come back with a fresh
/// initial score.
#[derive(Debug)]
pub struct LivenessSelector {
    config: LivenessConfig,
    evicted: Mutex<LruCache<u64, f64>>,
}

impl LivenessSelector {
    /// Selector remembering up to `config.cache_size` evicted scores.
    pub fn new(config: LivenessConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            config,
            evicted: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Score the candidate enters with: remembered or initial.
    pub fn candidate_liveness(&self, hash: u64) -> f64 {
        self.evicted
            .lock()
            .get(&hash)
            .copied()
            .unwrap_or(self.config.initial)
    }
}

impl SlotSelector for LivenessSelector {
    fn name(&self) -> &'static str {
        "liveness"
    }

    fn admit(&self, candidate: &Candidate<'_>, slot: &mut SlotMut<'_>) -> Admission {
        let own = self.candidate_liveness(candidate.hash());
        let mut entry = candidate.to_entry(slot.slot_ref());
        entry.set_data(LIVENESS_KEY, MetaValue::Float(own));

        if !slot.is_full() {
            return if slot.push(entry) {
                Admission::Admitted
            } else {
                Admission::Declined
            };
        }

        let least_live = slot
            .members()
            .iter()
            .map(|m| entry_liveness(m, &self.config))
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match least_live {
            Some((index, score)) if score <= self.config.threshold && score < own => {
                let Some(evicted) = slot.replace(index, entry) else {
                    return Admission::Declined;
                };
                trace!(hash = evicted.hash(), score, "least live member replaced");
                self.evicted.lock().put(evicted.hash(), score);
                Admission::Replaced {
                    evicted: evicted.hash(),
                }
            }
            _ => Admission::Declined,
        }
    }
}
