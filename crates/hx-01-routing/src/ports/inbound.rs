//! # Driving Ports (Inbound API)
//!
//! The API the message-processing and keep-alive collaborators use.

use std::net::SocketAddr;

use hx_identifier::Identifier;

use crate::domain::{NodeRecord, NotifyOutcome, RoutingTableEntry, RoutingTableStats};

/// Primary API of the overlay routing core.
///
/// # Example
///
/// ```rust,ignore
/// use hx_01_routing::ports::OverlayRoutingApi;
///
/// fn on_hello<T: OverlayRoutingApi>(api: &T, id: Identifier, from: SocketAddr) {
///     if let NotifyOutcome::Skipped(reason) = api.notify(id, from) {
///         tracing::debug!(?reason, "hello ignored");
///     }
/// }
/// ```
pub trait OverlayRoutingApi {
    /// A peer was observed at `addr`; place it, stamped with the current time.
    fn notify(&self, id: Identifier, addr: SocketAddr) -> NotifyOutcome;

    /// A bootstrap or recovery reply arrived; every listed peer is notified.
    fn recovery_reply(&self, peers: Vec<NodeRecord>) -> Vec<NotifyOutcome>;

    /// Snapshot of every entry of every sub-table.
    fn all_entries(&self) -> Vec<RoutingTableEntry>;

    /// Every entry for one identifier hash, at most one per sub-table.
    fn entries_by_id_hash(&self, hash: u64) -> Vec<RoutingTableEntry>;

    /// Unlink a peer from every sub-table, returning what was removed.
    fn remove_peer(&self, hash: u64) -> Vec<RoutingTableEntry>;

    /// Per-sub-table entry and slot counts.
    fn get_stats(&self) -> RoutingTableStats;
}
