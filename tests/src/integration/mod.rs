//! # Integration Scenarios
//!
//! Whole-service tests driving `RoutingService` through `OverlayRoutingApi`.

pub mod concurrency;
pub mod e2e;

use std::net::SocketAddr;
use std::sync::Once;

use hx_01_routing::{Identifier, NodeRecord};
use rand::Rng;

static TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Loopback address with the given port.
pub fn make_addr(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// `count` random peers with distinct hashes, none equal to `local`.
pub fn random_peers<R: Rng>(
    local: &NodeRecord,
    count: usize,
    rng: &mut R,
) -> Vec<NodeRecord> {
    let shape = local.id().shape();
    let mut peers: Vec<NodeRecord> = Vec::with_capacity(count);
    let mut port = 20_000u16;
    while peers.len() < count {
        let id = Identifier::random(shape.dimensions(), shape.digits_count(), rng)
            .expect("valid shape");
        let peer = NodeRecord::new(id, make_addr(port));
        if peer.hash() == local.hash() || peers.iter().any(|p| p.hash() == peer.hash()) {
            continue;
        }
        port = port.wrapping_add(1);
        peers.push(peer);
    }
    peers
}
