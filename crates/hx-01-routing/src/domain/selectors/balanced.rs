use std::collections::HashMap;

use hx_identifier::{orthant_number, semiring_number, Identifier, IdentifierError};
use tracing::debug;

use crate::domain::{RoutingTableEntry, SlotMut};

use super::{Admission, Candidate, SlotSelector};

/// How members are grouped around the local node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// `2^dimensions` orthants, one bit per axis.
    Orthants,
    /// Two halves of the identifier ring.
    Semirings,
}

impl Partition {
    fn bucket(self, local: &Identifier, id: &Identifier) -> Result<u64, IdentifierError> {
        match self {
            Partition::Orthants => orthant_number(local, id),
            Partition::Semirings => semiring_number(local, id),
        }
    }
}

/// Keeps the closest peers while spreading them evenly over the partition's
/// buckets. The slot is kept sorted by ascending distance.
///
/// Once full, with `max` the largest bucket count and `own` the candidate's:
/// - `own == max`: the worst member of the candidate's bucket is replaced if
///   the candidate is strictly closer;
/// - `own == max - 1`: the worst member across the fullest buckets is
///   replaced if the candidate is strictly closer;
/// - `own < max - 1`: the worst member across the fullest buckets is
///   replaced unconditionally.
///
/// No move can widen the gap between buckets, so once counts differ by at
/// most one they stay that way.
#[derive(Debug, Clone, Copy)]
pub struct BalancedSelector {
    partition: Partition,
}

/// Member count and worst member index of one bucket.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: usize,
    worst: usize,
}

impl BalancedSelector {
    /// Selector balancing over `partition`.
    pub fn new(partition: Partition) -> Self {
        Self { partition }
    }

    /// Which member to evict, and whether the candidate must beat it.
    fn victim(&self, local: &Identifier, members: &[RoutingTableEntry], own: u64) -> Option<(usize, bool)> {
        let mut buckets: HashMap<u64, Bucket> = HashMap::new();
        for (i, member) in members.iter().enumerate() {
            let Ok(b) = self.partition.bucket(local, member.id()) else {
                continue;
            };
            let bucket = buckets.entry(b).or_insert(Bucket { count: 0, worst: i });
            bucket.count += 1;
            if member.distance() >= members[bucket.worst].distance() {
                bucket.worst = i;
            }
        }

        let max = buckets.values().map(|b| b.count).max()?;
        let own_bucket = buckets.get(&own).copied();
        let own_count = own_bucket.map_or(0, |b| b.count);
        let worst_of_fullest = || {
            buckets
                .values()
                .filter(|b| b.count == max)
                .map(|b| b.worst)
                .max_by(|&a, &b| members[a].distance().total_cmp(&members[b].distance()))
        };

        if own_count == max {
            own_bucket.map(|b| (b.worst, true))
        } else if own_count + 1 == max {
            worst_of_fullest().map(|i| (i, true))
        } else {
            worst_of_fullest().map(|i| (i, false))
        }
    }
}

/// First position keeping `members` sorted by ascending distance.
fn sorted_position(members: &[RoutingTableEntry], distance: f64) -> usize {
    members.partition_point(|m| m.distance() <= distance)
}

impl SlotSelector for BalancedSelector {
    fn name(&self) -> &'static str {
        match self.partition {
            Partition::Orthants => "balanced-orthants",
            Partition::Semirings => "balanced-ring",
        }
    }

    fn admit(&self, candidate: &Candidate<'_>, slot: &mut SlotMut<'_>) -> Admission {
        let own = match self.partition.bucket(candidate.local, candidate.node.id()) {
            Ok(own) => own,
            Err(error) => {
                debug!(%error, "candidate has no bucket");
                return Admission::Declined;
            }
        };
        let entry = candidate.to_entry(slot.slot_ref());

        if !slot.is_full() {
            let at = sorted_position(slot.members(), candidate.distance);
            return if slot.insert(at, entry) {
                Admission::Admitted
            } else {
                Admission::Declined
            };
        }
        if slot.contains(candidate.hash()) {
            return Admission::Declined;
        }

        let Some((victim, must_improve)) = self.victim(candidate.local, slot.members(), own) else {
            return Admission::Declined;
        };
        if must_improve && candidate.distance >= slot.members()[victim].distance() {
            return Admission::Declined;
        }

        let Some(evicted) = slot.remove(victim) else {
            return Admission::Declined;
        };
        let at = sorted_position(slot.members(), candidate.distance);
        slot.insert(at, entry);
        Admission::Replaced {
            evicted: evicted.hash(),
        }
    }
}
