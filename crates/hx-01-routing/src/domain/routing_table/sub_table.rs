//! One sub-table: a sparse grid of bounded slots plus a hash index.

use std::collections::{BTreeMap, HashMap};

use crate::domain::SubTableKind;

use super::entry::{RoutingTableEntry, SlotIndex, SlotRef};

/// A `levels × columns` grid of slots holding at most `capacity` entries
/// each, indexed by identifier hash.
///
/// Only non-empty slots are stored, so RT1's `2^dimensions` logical columns
/// per level cost nothing until peers arrive.
#[derive(Debug, Clone)]
pub struct SubTable {
    kind: SubTableKind,
    levels: usize,
    columns: u64,
    capacity: usize,
    slots: BTreeMap<SlotIndex, Vec<RoutingTableEntry>>,
    by_hash: HashMap<u64, SlotIndex>,
}

impl SubTable {
    /// Create an empty sub-table.
    pub fn new(kind: SubTableKind, levels: usize, columns: u64, capacity: usize) -> Self {
        Self {
            kind,
            levels,
            columns,
            capacity,
            slots: BTreeMap::new(),
            by_hash: HashMap::new(),
        }
    }

    /// Which sub-table this is.
    pub fn kind(&self) -> SubTableKind {
        self.kind
    }

    /// Number of levels (rows).
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Logical number of columns per level.
    pub fn columns(&self) -> u64 {
        self.columns
    }

    /// Per-slot capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries across all slots.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    /// True when no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Number of slots holding at least one entry.
    pub fn occupied_slots(&self) -> usize {
        self.slots.len()
    }

    /// Whether a peer with this hash is stored.
    pub fn contains(&self, hash: u64) -> bool {
        self.by_hash.contains_key(&hash)
    }

    /// Entry for this hash.
    pub fn get(&self, hash: u64) -> Option<&RoutingTableEntry> {
        let index = self.by_hash.get(&hash)?;
        self.slots.get(index)?.iter().find(|e| e.hash() == hash)
    }

    /// Mutable entry for this hash.
    pub fn get_mut(&mut self, hash: u64) -> Option<&mut RoutingTableEntry> {
        let index = self.by_hash.get(&hash)?;
        self.slots
            .get_mut(index)?
            .iter_mut()
            .find(|e| e.hash() == hash)
    }

    /// Members of slot `[level][column]`, empty if never filled.
    pub fn slot(&self, level: usize, column: u64) -> &[RoutingTableEntry] {
        self.slots
            .get(&(level, column))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every entry, slot by slot.
    pub fn entries(&self) -> impl Iterator<Item = &RoutingTableEntry> {
        self.slots.values().flatten()
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut RoutingTableEntry> {
        self.slots.values_mut().flatten()
    }

    /// Unlink the entry for this hash from its slot and the index.
    pub fn remove(&mut self, hash: u64) -> Option<RoutingTableEntry> {
        let index = self.by_hash.remove(&hash)?;
        let slot = self.slots.get_mut(&index)?;
        let position = slot.iter().position(|e| e.hash() == hash)?;
        let entry = slot.remove(position);
        if slot.is_empty() {
            self.slots.remove(&index);
        }
        Some(entry.discard())
    }

    /// Mutable view of one slot for a selector.
    pub(crate) fn slot_mut(&mut self, level: usize, column: u64) -> SlotMut<'_> {
        debug_assert!(level < self.levels && column < self.columns);
        SlotMut {
            slot: SlotRef::new(self.kind, level, column),
            table: self,
        }
    }
}

/// A selector's handle on one slot.
///
/// Every mutation keeps the slot list and the hash index in step.
#[derive(Debug)]
pub struct SlotMut<'a> {
    table: &'a mut SubTable,
    slot: SlotRef,
}

impl SlotMut<'_> {
    /// Coordinates of this slot.
    pub fn slot_ref(&self) -> SlotRef {
        self.slot
    }

    /// Maximum number of members.
    pub fn capacity(&self) -> usize {
        self.table.capacity
    }

    /// Current number of members.
    pub fn len(&self) -> usize {
        self.members().len()
    }

    /// True when the slot has no members.
    pub fn is_empty(&self) -> bool {
        self.members().is_empty()
    }

    /// True when no member can be added without an eviction.
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Current members, in slot order.
    pub fn members(&self) -> &[RoutingTableEntry] {
        self.table.slot(self.slot.level, self.slot.column)
    }

    /// Whether the peer is stored anywhere in this sub-table.
    pub fn contains(&self, hash: u64) -> bool {
        self.table.contains(hash)
    }

    /// Insert at `index` (clamped to the end).
    ///
    /// Returns `false` without touching the slot when it is full or the
    /// peer is already stored in this sub-table.
    pub fn insert(&mut self, index: usize, entry: RoutingTableEntry) -> bool {
        if self.is_full() || self.table.contains(entry.hash()) {
            return false;
        }
        debug_assert_eq!(entry.slot(), self.slot);
        let key = self.slot.index();
        self.table.by_hash.insert(entry.hash(), key);
        let members = self.table.slots.entry(key).or_default();
        let index = index.min(members.len());
        members.insert(index, entry);
        true
    }

    /// Append at the end of the slot.
    pub fn push(&mut self, entry: RoutingTableEntry) -> bool {
        self.insert(usize::MAX, entry)
    }

    /// Remove the member at `index`.
    pub fn remove(&mut self, index: usize) -> Option<RoutingTableEntry> {
        let hash = self.members().get(index)?.hash();
        self.table.remove(hash)
    }

    /// Swap the member at `index` for `entry`, keeping its position.
    ///
    /// Returns the evicted member, or `None` (slot untouched) when `index`
    /// is out of range or `entry` is already stored in this sub-table.
    pub fn replace(&mut self, index: usize, entry: RoutingTableEntry) -> Option<RoutingTableEntry> {
        if index >= self.len() || self.table.contains(entry.hash()) {
            return None;
        }
        let evicted = self.remove(index)?;
        self.insert(index, entry);
        Some(evicted)
    }
}
