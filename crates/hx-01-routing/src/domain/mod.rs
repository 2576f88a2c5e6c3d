//! Domain Layer - Pure routing logic with no I/O
//!
//! This module contains the overlay routing core:
//! - Peer records, timestamps and the routing configuration
//! - The five-part routing table (NS, RT1, RT2, SecRT1, SecRT2)
//! - Slot selectors (admission and eviction policies)
//! - The placement engine that processes notifies

pub mod placement;
pub mod routing_table;
pub mod selectors;
/// Core domain types (entities, values, errors)
pub mod types;

pub use placement::*;
pub use routing_table::*;
pub use selectors::*;
pub use types::*;
