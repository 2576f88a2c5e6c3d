//! Routing Table Implementation
//!
//! Five sub-tables (NS, RT1, RT2, SecRT1, SecRT2), each a sparse grid of
//! bounded slots plus a hash index, behind independent reader/writer locks.

// Semantic submodules
mod entry;
mod stats;
mod sub_table;
mod table;

// Re-export public API
pub use entry::{MetaValue, RoutingTableEntry, SlotIndex, SlotRef};
pub use stats::{RoutingTableStats, SubTableStats};
pub use sub_table::{SlotMut, SubTable};
pub use table::{RoutingTable, TableReadGuard, TableWriteGuard};
