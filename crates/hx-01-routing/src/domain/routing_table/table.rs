//! Main RoutingTable implementation.
//!
//! Five independently locked sub-tables. Whole-table operations take every
//! lock in the fixed order NS → RT1 → RT2 → SecRT1 → SecRT2 and release them
//! in reverse; narrow operations lock one sub-table at a time.

use std::net::SocketAddr;

use hx_identifier::Identifier;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

use crate::domain::{RoutingConfig, RoutingError, SubTableKind};

use super::entry::{MetaValue, RoutingTableEntry};
use super::stats::{RoutingTableStats, SubTableStats};
use super::sub_table::SubTable;

/// The local node's routing state.
#[derive(Debug)]
pub struct RoutingTable {
    ns: RwLock<SubTable>,
    rt1: RwLock<SubTable>,
    rt2: RwLock<SubTable>,
    sec_rt1: RwLock<SubTable>,
    sec_rt2: RwLock<SubTable>,
}

impl RoutingTable {
    /// Size the five sub-tables for `config`.
    ///
    /// RT1 has `2^dimensions` logical columns per level, RT2 one column per
    /// dimension; both have `digits_count` levels.
    pub fn new(config: &RoutingConfig) -> Self {
        let levels = config.digits_count;
        let slot = config.routing_table_slot_size;
        let rt1_columns = if config.dimensions < 64 {
            1u64 << config.dimensions
        } else {
            u64::MAX
        };
        let rt2_columns = config.dimensions as u64;

        let table = |kind, columns| RwLock::new(SubTable::new(kind, levels, columns, slot));
        Self {
            ns: RwLock::new(SubTable::new(SubTableKind::Ns, 1, 1, config.ns_size)),
            rt1: table(SubTableKind::Rt1, rt1_columns),
            rt2: table(SubTableKind::Rt2, rt2_columns),
            sec_rt1: table(SubTableKind::SecRt1, rt1_columns),
            sec_rt2: table(SubTableKind::SecRt2, rt2_columns),
        }
    }

    /// Lock handle of one sub-table.
    pub fn sub_table(&self, kind: SubTableKind) -> &RwLock<SubTable> {
        match kind {
            SubTableKind::Ns => &self.ns,
            SubTableKind::Rt1 => &self.rt1,
            SubTableKind::Rt2 => &self.rt2,
            SubTableKind::SecRt1 => &self.sec_rt1,
            SubTableKind::SecRt2 => &self.sec_rt2,
        }
    }

    /// Read-lock all five sub-tables in lock order.
    pub fn lock_for_read(&self) -> TableReadGuard<'_> {
        let ns = self.ns.read();
        let rt1 = self.rt1.read();
        let rt2 = self.rt2.read();
        let sec_rt1 = self.sec_rt1.read();
        let sec_rt2 = self.sec_rt2.read();
        TableReadGuard {
            sec_rt2,
            sec_rt1,
            rt2,
            rt1,
            ns,
        }
    }

    /// Write-lock all five sub-tables in lock order.
    pub fn lock_for_write(&self) -> TableWriteGuard<'_> {
        let ns = self.ns.write();
        let rt1 = self.rt1.write();
        let rt2 = self.rt2.write();
        let sec_rt1 = self.sec_rt1.write();
        let sec_rt2 = self.sec_rt2.write();
        TableWriteGuard {
            sec_rt2,
            sec_rt1,
            rt2,
            rt1,
            ns,
        }
    }

    /// Snapshot of every entry in every sub-table.
    pub fn all_entries(&self) -> Vec<RoutingTableEntry> {
        let guard = self.lock_for_read();
        SubTableKind::ALL
            .iter()
            .flat_map(|&kind| guard.get(kind).entries().cloned().collect::<Vec<_>>())
            .collect()
    }

    /// Every entry sharing this identifier hash, at most one per sub-table.
    pub fn entries_by_id_hash(&self, hash: u64) -> Vec<RoutingTableEntry> {
        let guard = self.lock_for_read();
        SubTableKind::ALL
            .iter()
            .filter_map(|&kind| guard.get(kind).get(hash).cloned())
            .collect()
    }

    /// Per-sub-table entry and slot counts.
    pub fn stats(&self) -> RoutingTableStats {
        let guard = self.lock_for_read();
        let of = |kind| {
            let table = guard.get(kind);
            SubTableStats {
                entries: table.len(),
                occupied_slots: table.occupied_slots(),
            }
        };
        RoutingTableStats {
            ns: of(SubTableKind::Ns),
            rt1: of(SubTableKind::Rt1),
            rt2: of(SubTableKind::Rt2),
            sec_rt1: of(SubTableKind::SecRt1),
            sec_rt2: of(SubTableKind::SecRt2),
        }
    }

    /// Rewrite the address of every entry holding `id`.
    ///
    /// Returns the number of entries updated.
    pub fn update_address(&self, id: &Identifier, addr: SocketAddr) -> usize {
        let hash = id.calculate_hash();
        self.update_entries(hash, |entry| {
            if entry.id() == id && entry.addr() != addr {
                entry.set_addr(addr);
                true
            } else {
                false
            }
        })
    }

    /// Apply `update` to the entry for `hash` in every sub-table, one write
    /// lock at a time. `update` reports whether it changed the entry.
    ///
    /// Returns the number of entries changed.
    pub fn update_entries<F>(&self, hash: u64, mut update: F) -> usize
    where
        F: FnMut(&mut RoutingTableEntry) -> bool,
    {
        SubTableKind::ALL
            .iter()
            .filter(|&&kind| {
                let mut table = self.sub_table(kind).write();
                table.get_mut(hash).is_some_and(&mut update)
            })
            .count()
    }

    /// Apply `update` to every entry of every sub-table, one write lock at
    /// a time.
    pub fn update_all_entries<F>(&self, mut update: F)
    where
        F: FnMut(&mut RoutingTableEntry),
    {
        for kind in SubTableKind::ALL {
            let mut table = self.sub_table(kind).write();
            table.entries_mut().for_each(&mut update);
        }
    }

    /// Unlink a peer from every sub-table. Returns the removed entries.
    pub fn remove_peer(&self, hash: u64) -> Vec<RoutingTableEntry> {
        let removed: Vec<_> = SubTableKind::ALL
            .iter()
            .filter_map(|&kind| self.sub_table(kind).write().remove(hash))
            .collect();
        if !removed.is_empty() {
            debug!(hash, count = removed.len(), "peer removed");
        }
        removed
    }

    /// Remove every entry matching `dead`, one write lock at a time.
    pub fn remove_where<F>(&self, mut dead: F) -> Vec<RoutingTableEntry>
    where
        F: FnMut(&RoutingTableEntry) -> bool,
    {
        let mut removed = Vec::new();
        for kind in SubTableKind::ALL {
            let mut table = self.sub_table(kind).write();
            let hashes: Vec<u64> = table.entries().filter(|e| dead(e)).map(|e| e.hash()).collect();
            for hash in hashes {
                if let Some(entry) = table.remove(hash) {
                    trace!(table = %kind, hash, "entry evicted");
                    removed.push(entry);
                }
            }
        }
        removed
    }

    /// Metadata value stored on a peer's entry in one sub-table.
    pub fn get_data(&self, kind: SubTableKind, hash: u64, key: &str) -> Option<MetaValue> {
        self.sub_table(kind).read().get(hash)?.get_data(key).cloned()
    }

    /// Store a metadata value on a peer's entry in one sub-table.
    pub fn set_data(
        &self,
        kind: SubTableKind,
        hash: u64,
        key: &str,
        value: MetaValue,
    ) -> Result<Option<MetaValue>, RoutingError> {
        let mut table = self.sub_table(kind).write();
        let entry = table
            .get_mut(hash)
            .ok_or(RoutingError::PeerNotFound { hash, table: kind })?;
        Ok(entry.set_data(key, value))
    }
}

/// All five read locks. Fields drop in declaration order, so the locks are
/// released SecRT2 first and NS last.
pub struct TableReadGuard<'a> {
    sec_rt2: RwLockReadGuard<'a, SubTable>,
    sec_rt1: RwLockReadGuard<'a, SubTable>,
    rt2: RwLockReadGuard<'a, SubTable>,
    rt1: RwLockReadGuard<'a, SubTable>,
    ns: RwLockReadGuard<'a, SubTable>,
}

impl TableReadGuard<'_> {
    /// One of the locked sub-tables.
    pub fn get(&self, kind: SubTableKind) -> &SubTable {
        match kind {
            SubTableKind::Ns => &self.ns,
            SubTableKind::Rt1 => &self.rt1,
            SubTableKind::Rt2 => &self.rt2,
            SubTableKind::SecRt1 => &self.sec_rt1,
            SubTableKind::SecRt2 => &self.sec_rt2,
        }
    }
}

/// All five write locks, released in reverse lock order.
pub struct TableWriteGuard<'a> {
    sec_rt2: RwLockWriteGuard<'a, SubTable>,
    sec_rt1: RwLockWriteGuard<'a, SubTable>,
    rt2: RwLockWriteGuard<'a, SubTable>,
    rt1: RwLockWriteGuard<'a, SubTable>,
    ns: RwLockWriteGuard<'a, SubTable>,
}

impl TableWriteGuard<'_> {
    /// One of the locked sub-tables.
    pub fn get(&self, kind: SubTableKind) -> &SubTable {
        match kind {
            SubTableKind::Ns => &self.ns,
            SubTableKind::Rt1 => &self.rt1,
            SubTableKind::Rt2 => &self.rt2,
            SubTableKind::SecRt1 => &self.sec_rt1,
            SubTableKind::SecRt2 => &self.sec_rt2,
        }
    }

    /// One of the locked sub-tables, mutably.
    pub fn get_mut(&mut self, kind: SubTableKind) -> &mut SubTable {
        match kind {
            SubTableKind::Ns => &mut self.ns,
            SubTableKind::Rt1 => &mut self.rt1,
            SubTableKind::Rt2 => &mut self.rt2,
            SubTableKind::SecRt1 => &mut self.sec_rt1,
            SubTableKind::SecRt2 => &mut self.sec_rt2,
        }
    }
}
