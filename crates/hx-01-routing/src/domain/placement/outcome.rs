//! Notify outcomes and placement counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{Admission, SubTableKind};

/// Why a notify did not reach the sub-tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The peer is the local node.
    SelfNotification,
    /// The peer's identifier shape differs from the configured one.
    ShapeMismatch,
    /// The peer was placed within the retention window.
    RecentlyProcessed,
    /// Another caller is placing the same peer.
    AlreadyInProgress,
    /// A different identifier with the same hash is already stored.
    HashCollision,
    /// The peer is stored under another address and updates are disabled.
    AddressConflict,
}

/// What happened in one sub-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablePlacement {
    /// The sub-table is not in use.
    #[default]
    Disabled,
    /// The peer already had an entry here.
    AlreadyPresent,
    /// An exclusion rule kept the peer out.
    Excluded,
    /// The peer is not in any sibling hypercube of the local node.
    NotAdjacent,
    /// The slot's selector was consulted.
    Considered {
        /// Slot level.
        level: usize,
        /// Slot column.
        column: u64,
        /// The selector's decision.
        admission: Admission,
    },
}

impl TablePlacement {
    /// The selector admitted the peer.
    pub fn is_admitted(&self) -> bool {
        matches!(self, TablePlacement::Considered { admission, .. } if admission.is_admitted())
    }

    /// The peer is in this sub-table after the notify.
    pub fn holds_peer(&self) -> bool {
        self.is_admitted() || *self == TablePlacement::AlreadyPresent
    }

    /// Hash of the member evicted to make room, if any.
    pub fn evicted(&self) -> Option<u64> {
        match self {
            TablePlacement::Considered {
                admission: Admission::Replaced { evicted },
                ..
            } => Some(*evicted),
            _ => None,
        }
    }
}

/// Per-sub-table result of placing one peer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    /// Identifier hash of the peer.
    pub hash: u64,
    /// Distance to the local node.
    pub distance: f64,
    /// Neighborhood set.
    pub ns: TablePlacement,
    /// Primary routing table.
    pub rt1: TablePlacement,
    /// Secondary routing table.
    pub rt2: TablePlacement,
    /// Secure primary routing table.
    pub sec_rt1: TablePlacement,
    /// Secure secondary routing table.
    pub sec_rt2: TablePlacement,
}

impl PlacementReport {
    /// Placement in one sub-table.
    pub fn get(&self, kind: SubTableKind) -> TablePlacement {
        match kind {
            SubTableKind::Ns => self.ns,
            SubTableKind::Rt1 => self.rt1,
            SubTableKind::Rt2 => self.rt2,
            SubTableKind::SecRt1 => self.sec_rt1,
            SubTableKind::SecRt2 => self.sec_rt2,
        }
    }

    /// Sub-tables that admitted the peer.
    pub fn admitted_to(&self) -> Vec<SubTableKind> {
        SubTableKind::ALL
            .into_iter()
            .filter(|&kind| self.get(kind).is_admitted())
            .collect()
    }

    /// Hashes evicted to make room, one per sub-table at most.
    pub fn evictions(&self) -> Vec<(SubTableKind, u64)> {
        SubTableKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).evicted().map(|hash| (kind, hash)))
            .collect()
    }
}

/// Result of one notify.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    /// The peer went through placement.
    Processed(PlacementReport),
    /// The peer was dropped before placement.
    Skipped(SkipReason),
}

impl NotifyOutcome {
    /// The report, if the peer was placed.
    pub fn report(&self) -> Option<&PlacementReport> {
        match self {
            NotifyOutcome::Processed(report) => Some(report),
            NotifyOutcome::Skipped(_) => None,
        }
    }

    /// The skip reason, if the peer was dropped.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            NotifyOutcome::Skipped(reason) => Some(*reason),
            NotifyOutcome::Processed(_) => None,
        }
    }
}

/// Snapshot of the engine's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementStats {
    /// Notifies that reached placement.
    pub considered: u64,
    /// Notifies dropped before placement.
    pub skipped: u64,
    /// Admissions across all sub-tables.
    pub admitted: u64,
    /// Evictions across all sub-tables.
    pub evicted: u64,
}

#[derive(Debug, Default)]
pub(crate) struct PlacementCounters {
    considered: AtomicU64,
    skipped: AtomicU64,
    admitted: AtomicU64,
    evicted: AtomicU64,
}

impl PlacementCounters {
    pub(crate) fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_report(&self, report: &PlacementReport) {
        self.considered.fetch_add(1, Ordering::Relaxed);
        let admitted = report.admitted_to().len() as u64;
        let evicted = report.evictions().len() as u64;
        self.admitted.fetch_add(admitted, Ordering::Relaxed);
        self.evicted.fetch_add(evicted, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PlacementStats {
        PlacementStats {
            considered: self.considered.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}
