//! Routing table entries and their slot back-references.

use std::collections::HashMap;
use std::net::SocketAddr;

use hx_identifier::Identifier;

use crate::domain::{NodeRecord, SubTableKind, Timestamp};

/// Slot coordinates inside one sub-table: `(level, column)`.
///
/// The column is a digit value in RT1, a dimension in RT2 and always 0 in NS.
pub type SlotIndex = (usize, u64);

/// Typed back-reference from an entry to the slot holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    /// Owning sub-table.
    pub table: SubTableKind,
    /// Level (row) inside the sub-table.
    pub level: usize,
    /// Column inside the level.
    pub column: u64,
}

impl SlotRef {
    /// Slot `[level][column]` of `table`.
    pub fn new(table: SubTableKind, level: usize, column: u64) -> Self {
        Self {
            table,
            level,
            column,
        }
    }

    /// The single neighborhood-set slot.
    pub fn ns() -> Self {
        Self::new(SubTableKind::Ns, 0, 0)
    }

    pub(crate) fn index(&self) -> SlotIndex {
        (self.level, self.column)
    }
}

/// Value stored in an entry's metadata map.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// Floating point value (liveness scores).
    Float(f64),
    /// Integer value (counters).
    Int(i64),
    /// Free text.
    Text(String),
    /// Boolean flag.
    Flag(bool),
}

impl MetaValue {
    /// The value as a float, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Float(v) => Some(*v),
            MetaValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// A peer admitted to one slot of one sub-table.
///
/// Created by a slot selector on admission and mutated only under the
/// owning sub-table's write lock.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTableEntry {
    node: NodeRecord,
    distance: f64,
    created_at: Timestamp,
    slot: SlotRef,
    enabled: bool,
    discarded: bool,
    metadata: HashMap<String, MetaValue>,
}

impl RoutingTableEntry {
    pub(crate) fn new(node: NodeRecord, distance: f64, created_at: Timestamp, slot: SlotRef) -> Self {
        Self {
            node,
            distance,
            created_at,
            slot,
            enabled: true,
            discarded: false,
            metadata: HashMap::new(),
        }
    }

    /// The stored peer.
    pub fn node(&self) -> &NodeRecord {
        &self.node
    }

    /// Peer identifier.
    pub fn id(&self) -> &Identifier {
        self.node.id()
    }

    /// Peer address.
    pub fn addr(&self) -> SocketAddr {
        self.node.addr()
    }

    /// Identifier hash.
    pub fn hash(&self) -> u64 {
        self.node.hash()
    }

    /// Distance to the local node, cached at admission.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Admission time.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Owning slot.
    pub fn slot(&self) -> SlotRef {
        self.slot
    }

    /// Whether the entry is used for routing.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disable or re-enable the entry without removing it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True once the entry has been unlinked from its slot.
    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    /// Metadata value for `key`.
    pub fn get_data(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }

    /// Store a metadata value, returning the previous one.
    pub fn set_data(&mut self, key: impl Into<String>, value: MetaValue) -> Option<MetaValue> {
        self.metadata.insert(key.into(), value)
    }

    pub(crate) fn set_addr(&mut self, addr: SocketAddr) {
        self.node.set_addr(addr);
    }

    pub(crate) fn discard(mut self) -> Self {
        self.discarded = true;
        self.enabled = false;
        self
    }
}
