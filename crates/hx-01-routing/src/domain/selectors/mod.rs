//! Slot selectors: admission and eviction policies for a single slot.
//!
//! A selector is offered a candidate and a mutable slot while the caller
//! holds the owning sub-table's write lock. It admits, replaces a member or
//! declines; it never fails. Faults such as a zero capacity or an
//! out-of-range dimension count are rejected by `RoutingConfig::validate`
//! before any selector is built.

mod balanced;
mod distance;
mod evenness;
mod liveness;
mod secure;
mod simple;

use std::cmp::Ordering;
use std::fmt;

use hx_identifier::Identifier;

use crate::domain::{
    NodeRecord, NsSelectorKind, RoutingConfig, RoutingTableEntry, RtSelectorKind, SlotMut,
    SlotRef, Timestamp,
};

pub use balanced::{BalancedSelector, Partition};
pub use distance::DistanceSelector;
pub use evenness::EvennessSelector;
pub use liveness::{entry_liveness, LivenessSelector, LIVENESS_KEY};
pub use secure::SecureSelector;
pub use simple::SimpleSelector;

/// Result of offering a candidate to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Added without evicting anyone.
    Admitted,
    /// Added in place of the member with this hash.
    Replaced {
        /// Hash of the evicted member.
        evicted: u64,
    },
    /// Not added.
    Declined,
}

impl Admission {
    /// True when the candidate is now a member.
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::Declined)
    }
}

/// A peer offered to a slot.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The peer.
    pub node: &'a NodeRecord,
    /// The local node's identifier.
    pub local: &'a Identifier,
    /// Distance from the local node under the configured metric.
    pub distance: f64,
    /// Notification time.
    pub timestamp: Timestamp,
}

impl Candidate<'_> {
    /// Hash of the candidate's identifier.
    pub fn hash(&self) -> u64 {
        self.node.hash()
    }

    /// A fresh entry for this candidate, owned by `slot`.
    pub fn to_entry(&self, slot: SlotRef) -> RoutingTableEntry {
        RoutingTableEntry::new(self.node.clone(), self.distance, self.timestamp, slot)
    }
}

/// Admission policy for one slot.
pub trait SlotSelector: Send + Sync + fmt::Debug {
    /// Short policy name used in logs.
    fn name(&self) -> &'static str;

    /// Admit, replace or decline `candidate` in `slot`.
    fn admit(&self, candidate: &Candidate<'_>, slot: &mut SlotMut<'_>) -> Admission;
}

/// Selector for the neighborhood set.
pub fn ns_selector(config: &RoutingConfig) -> Box<dyn SlotSelector> {
    match config.ns_selector {
        NsSelectorKind::Simple => Box::new(SimpleSelector),
        NsSelectorKind::Distance => Box::new(DistanceSelector),
        NsSelectorKind::BalancedOrthants => Box::new(BalancedSelector::new(Partition::Orthants)),
        NsSelectorKind::BalancedRing => Box::new(BalancedSelector::new(Partition::Semirings)),
        NsSelectorKind::AvgDistEvenness => {
            Box::new(EvennessSelector::new(config.metric, config.evenness.clone()))
        }
        NsSelectorKind::Liveness => Box::new(LivenessSelector::new(config.liveness.clone())),
    }
}

/// Selector for RT1 and RT2.
pub fn rt_selector(config: &RoutingConfig) -> Box<dyn SlotSelector> {
    match config.rt_selector {
        RtSelectorKind::Simple => Box::new(SimpleSelector),
        RtSelectorKind::Distance => Box::new(DistanceSelector),
        RtSelectorKind::Liveness => Box::new(LivenessSelector::new(config.liveness.clone())),
    }
}

/// Selector for SecRT1 and SecRT2.
pub fn secure_selector(config: &RoutingConfig) -> Box<dyn SlotSelector> {
    Box::new(SecureSelector::new(config.metric, &config.secure))
}

/// Index and key of the member with the largest key; ties keep the first.
pub(crate) fn worst_by<F>(members: &[RoutingTableEntry], mut key: F) -> Option<(usize, f64)>
where
    F: FnMut(&RoutingTableEntry) -> f64,
{
    members
        .iter()
        .enumerate()
        .map(|(i, m)| (i, key(m)))
        .fold(None, |worst: Option<(usize, f64)>, (i, k)| match worst {
            Some((_, w)) if k.total_cmp(&w) != Ordering::Greater => worst,
            _ => Some((i, k)),
        })
}
