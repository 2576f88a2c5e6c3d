//! Placement of newly observed peers.
//!
//! A notify passes the gate (self, shape, in-flight, recency, collision and
//! address checks), then the neighborhood set, RT1 and RT2 and, with secure
//! routing on, SecRT1 and SecRT2 are each offered the peer under their own
//! write lock.

mod adjacency;
mod engine;
mod guard;
mod outcome;

pub use adjacency::{Adjacency, Rt2Scan};
pub use engine::PlacementEngine;
pub use guard::{InFlight, InFlightGuard, RecentlyProcessed};
pub use outcome::{NotifyOutcome, PlacementReport, PlacementStats, SkipReason, TablePlacement};
