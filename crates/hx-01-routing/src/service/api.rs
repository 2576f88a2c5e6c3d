use std::net::SocketAddr;

use hx_identifier::Identifier;

use crate::domain::{NodeRecord, NotifyOutcome, RoutingTableEntry, RoutingTableStats};
use crate::ports::OverlayRoutingApi;
use crate::service::RoutingService;

impl OverlayRoutingApi for RoutingService {
    fn notify(&self, id: Identifier, addr: SocketAddr) -> NotifyOutcome {
        let now = self.now();
        self.engine.notify(NodeRecord::new(id, addr), now)
    }

    fn recovery_reply(&self, peers: Vec<NodeRecord>) -> Vec<NotifyOutcome> {
        let now = self.now();
        self.engine.recovery_reply(peers, now)
    }

    fn all_entries(&self) -> Vec<RoutingTableEntry> {
        self.engine.table().all_entries()
    }

    fn entries_by_id_hash(&self, hash: u64) -> Vec<RoutingTableEntry> {
        self.engine.table().entries_by_id_hash(hash)
    }

    fn remove_peer(&self, hash: u64) -> Vec<RoutingTableEntry> {
        self.engine.table().remove_peer(hash)
    }

    fn get_stats(&self) -> RoutingTableStats {
        self.engine.table().stats()
    }
}
