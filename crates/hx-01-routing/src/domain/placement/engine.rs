//! The notify processor: decides which slots of which sub-tables a newly
//! observed peer is offered to.

use hx_identifier::{Identifier, IdentifierError};
use tracing::{debug, trace, warn};

use crate::domain::selectors::{ns_selector, rt_selector, secure_selector};
use crate::domain::{
    Candidate, NodeRecord, RoutingConfig, RoutingError, RoutingTable, SlotSelector, SubTableKind,
    Timestamp,
};

use super::adjacency::Adjacency;
use super::guard::{InFlight, InFlightGuard, RecentlyProcessed};
use super::outcome::{
    NotifyOutcome, PlacementCounters, PlacementReport, PlacementStats, SkipReason, TablePlacement,
};

/// Which routing tables of a pair are filled.
#[derive(Debug, Clone, Copy)]
struct RoutingPair {
    rt1: SubTableKind,
    rt2: SubTableKind,
    use_rt1: bool,
    use_rt2: bool,
}

/// Places notified peers into the local routing table.
#[derive(Debug)]
pub struct PlacementEngine {
    local: NodeRecord,
    config: RoutingConfig,
    table: RoutingTable,
    ns_selector: Box<dyn SlotSelector>,
    rt_selector: Box<dyn SlotSelector>,
    secure_selector: Option<Box<dyn SlotSelector>>,
    in_flight: InFlight,
    recent: Option<RecentlyProcessed>,
    counters: PlacementCounters,
}

impl PlacementEngine {
    /// Engine for the local node `local`.
    ///
    /// Fails when the configuration is invalid or `local` does not have the
    /// configured identifier shape.
    pub fn new(local: NodeRecord, config: RoutingConfig) -> Result<Self, RoutingError> {
        config.validate()?;
        let expected = config.shape()?;
        let actual = local.id().shape();
        if actual != expected {
            return Err(RoutingError::LocalShape { expected, actual });
        }

        let recent = (config.recently_processed_retention_ms > 0).then(|| {
            RecentlyProcessed::new(
                config.recently_processed_retention_ms,
                config.recently_processed_capacity,
            )
        });
        let secure = config.use_secure_routing.then(|| secure_selector(&config));

        debug!(
            local = %local,
            ns = config.ns_size,
            slot = config.routing_table_slot_size,
            secure = config.use_secure_routing,
            "placement engine ready"
        );
        Ok(Self {
            table: RoutingTable::new(&config),
            ns_selector: ns_selector(&config),
            rt_selector: rt_selector(&config),
            secure_selector: secure,
            in_flight: InFlight::new(),
            recent,
            counters: PlacementCounters::default(),
            local,
            config,
        })
    }

    /// The local node.
    pub fn local(&self) -> &NodeRecord {
        &self.local
    }

    /// Active configuration.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// The routing table being filled.
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Counters since construction.
    pub fn stats(&self) -> PlacementStats {
        self.counters.snapshot()
    }

    /// Offer a newly observed peer to every sub-table it may belong to.
    pub fn notify(&self, peer: NodeRecord, timestamp: Timestamp) -> NotifyOutcome {
        let hash = peer.hash();
        let outcome = match self.gate(&peer, timestamp) {
            Err(reason) => NotifyOutcome::Skipped(reason),
            Ok(_guard) => match self.place(&peer, timestamp) {
                Ok(report) => {
                    if let Some(recent) = &self.recent {
                        recent.record(hash, timestamp);
                    }
                    NotifyOutcome::Processed(report)
                }
                Err(error) => {
                    warn!(hash, %error, "peer could not be placed");
                    NotifyOutcome::Skipped(SkipReason::ShapeMismatch)
                }
            },
        };

        match &outcome {
            NotifyOutcome::Processed(report) => self.counters.record_report(report),
            NotifyOutcome::Skipped(_) => self.counters.record_skip(),
        }
        outcome
    }

    /// Feed every peer of a recovery reply through [`notify`](Self::notify).
    pub fn recovery_reply<I>(&self, peers: I, timestamp: Timestamp) -> Vec<NotifyOutcome>
    where
        I: IntoIterator<Item = NodeRecord>,
    {
        peers
            .into_iter()
            .map(|peer| self.notify(peer, timestamp))
            .collect()
    }

    /// Checks run before placement: self, shape, in-flight, recency, then
    /// collisions and address changes against stored entries.
    fn gate(
        &self,
        peer: &NodeRecord,
        timestamp: Timestamp,
    ) -> Result<InFlightGuard<'_>, SkipReason> {
        let hash = peer.hash();
        if hash == self.local.hash() {
            debug!(hash, "self notification ignored");
            return Err(SkipReason::SelfNotification);
        }
        if peer.id().shape() != self.local.id().shape() {
            debug!(hash, shape = %peer.id().shape(), "peer shape mismatch");
            return Err(SkipReason::ShapeMismatch);
        }
        let Some(guard) = self.in_flight.try_acquire(hash) else {
            debug!(hash, "peer already being placed");
            return Err(SkipReason::AlreadyInProgress);
        };
        if self
            .recent
            .as_ref()
            .is_some_and(|recent| recent.is_recent(hash, timestamp))
        {
            debug!(hash, "peer recently processed");
            return Err(SkipReason::RecentlyProcessed);
        }

        let existing = self.table.entries_by_id_hash(hash);
        if existing.iter().any(|e| e.id() != peer.id()) {
            warn!(hash, peer = %peer, "identifier hash collision");
            return Err(SkipReason::HashCollision);
        }
        if existing.iter().any(|e| e.addr() != peer.addr()) {
            if !self.config.update_network_address_when_different {
                warn!(hash, addr = %peer.addr(), "address conflict");
                return Err(SkipReason::AddressConflict);
            }
            let updated = self.table.update_address(peer.id(), peer.addr());
            debug!(hash, addr = %peer.addr(), updated, "peer address updated");
        }
        Ok(guard)
    }

    fn place(
        &self,
        peer: &NodeRecord,
        timestamp: Timestamp,
    ) -> Result<PlacementReport, IdentifierError> {
        let local = self.local.id();
        let distance = self.config.metric.measure(local, peer.id())?;
        let candidate = Candidate {
            node: peer,
            local,
            distance,
            timestamp,
        };

        let mut report = PlacementReport {
            hash: peer.hash(),
            distance,
            ns: TablePlacement::Disabled,
            rt1: TablePlacement::Disabled,
            rt2: TablePlacement::Disabled,
            sec_rt1: TablePlacement::Disabled,
            sec_rt2: TablePlacement::Disabled,
        };

        if self.config.use_ns {
            report.ns = self.offer(SubTableKind::Ns, 0, 0, self.ns_selector.as_ref(), &candidate);
        }

        if !self.config.uses_routing_tables() {
            return Ok(report);
        }
        let adjacency = Adjacency::compute(local, peer.id())?;
        let primary = RoutingPair {
            rt1: SubTableKind::Rt1,
            rt2: SubTableKind::Rt2,
            use_rt1: self.config.use_rt1,
            use_rt2: self.config.use_rt2,
        };
        (report.rt1, report.rt2) =
            self.place_routing(primary, self.rt_selector.as_ref(), &candidate, &adjacency)?;

        if let Some(secure) = &self.secure_selector {
            let pair = RoutingPair {
                rt1: SubTableKind::SecRt1,
                rt2: SubTableKind::SecRt2,
                use_rt1: true,
                use_rt2: true,
            };
            (report.sec_rt1, report.sec_rt2) =
                self.place_routing(pair, secure.as_ref(), &candidate, &adjacency)?;
        }
        Ok(report)
    }

    fn place_routing(
        &self,
        pair: RoutingPair,
        selector: &dyn SlotSelector,
        candidate: &Candidate<'_>,
        adjacency: &Adjacency,
    ) -> Result<(TablePlacement, TablePlacement), IdentifierError> {
        let local = candidate.local;
        let peer = candidate.node.id();

        let rt1 = if !(pair.use_rt1 || pair.use_rt2) {
            TablePlacement::Disabled
        } else if self.is_present(pair.rt1, candidate.hash()) {
            TablePlacement::AlreadyPresent
        } else if !pair.use_rt1 && !adjacency.sibling {
            TablePlacement::Excluded
        } else if self.config.exclude_rt2_scope_from_rt1
            && self.covered_by_rt2_below(local, peer, adjacency)?
        {
            TablePlacement::Excluded
        } else {
            self.offer(
                pair.rt1,
                adjacency.rt1_level,
                adjacency.rt1_column,
                selector,
                candidate,
            )
        };

        let rt2 = if !pair.use_rt2 {
            TablePlacement::Disabled
        } else if self.is_present(pair.rt2, candidate.hash()) {
            TablePlacement::AlreadyPresent
        } else {
            match &adjacency.rt2 {
                None => TablePlacement::NotAdjacent,
                Some(scan) => {
                    let below = if rt1.holds_peer() {
                        scan.max_level
                    } else {
                        scan.max_level + 1
                    };
                    match scan.matching_level(local, peer, below)? {
                        Some(level) => {
                            self.offer(pair.rt2, level, scan.dimension as u64, selector, candidate)
                        }
                        None => TablePlacement::NotAdjacent,
                    }
                }
            }
        };
        Ok((rt1, rt2))
    }

    fn covered_by_rt2_below(
        &self,
        local: &Identifier,
        peer: &Identifier,
        adjacency: &Adjacency,
    ) -> Result<bool, IdentifierError> {
        match &adjacency.rt2 {
            Some(scan) => Ok(scan
                .matching_level(local, peer, adjacency.rt1_level)?
                .is_some()),
            None => Ok(false),
        }
    }

    fn is_present(&self, kind: SubTableKind, hash: u64) -> bool {
        self.table.sub_table(kind).read().contains(hash)
    }

    fn offer(
        &self,
        kind: SubTableKind,
        level: usize,
        column: u64,
        selector: &dyn SlotSelector,
        candidate: &Candidate<'_>,
    ) -> TablePlacement {
        let mut table = self.table.sub_table(kind).write();
        if table.contains(candidate.hash()) {
            return TablePlacement::AlreadyPresent;
        }
        let mut slot = table.slot_mut(level, column);
        let admission = selector.admit(candidate, &mut slot);
        trace!(
            table = %kind,
            level,
            column,
            hash = candidate.hash(),
            selector = selector.name(),
            ?admission,
            "slot offer"
        );
        TablePlacement::Considered {
            level,
            column,
            admission,
        }
    }
}
