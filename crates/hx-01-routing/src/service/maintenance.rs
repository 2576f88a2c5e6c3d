use tracing::debug;

use crate::domain::{entry_liveness, MetaValue, RoutingTableEntry, LIVENESS_KEY};
use crate::service::RoutingService;

impl RoutingService {
    /// A pong arrived from the peer: boost its liveness toward the maximum
    /// in every sub-table holding it.
    ///
    /// Call from the keep-alive subsystem. Returns the number of entries
    /// updated.
    pub fn record_pong(&self, hash: u64) -> usize {
        let liveness = &self.engine.config().liveness;
        self.engine.table().update_entries(hash, |entry| {
            let score = liveness.boosted(entry_liveness(entry, liveness));
            entry.set_data(LIVENESS_KEY, MetaValue::Float(score));
            true
        })
    }

    /// A ping to the peer went unanswered: decay its liveness toward zero.
    pub fn record_missed_pong(&self, hash: u64) -> usize {
        let liveness = &self.engine.config().liveness;
        self.engine.table().update_entries(hash, |entry| {
            let score = liveness.decayed(entry_liveness(entry, liveness));
            entry.set_data(LIVENESS_KEY, MetaValue::Float(score));
            true
        })
    }

    /// Remove every entry whose liveness fell to or below `threshold`.
    ///
    /// Entries never scored keep the initial liveness.
    pub fn evict_dead(&self, threshold: f64) -> Vec<RoutingTableEntry> {
        let liveness = &self.engine.config().liveness;
        let removed = self
            .engine
            .table()
            .remove_where(|entry| entry_liveness(entry, liveness) <= threshold);
        if !removed.is_empty() {
            debug!(count = removed.len(), threshold, "dead entries evicted");
        }
        removed
    }
}
