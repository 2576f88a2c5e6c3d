//! # Concurrent Notifies
//!
//! Many threads notifying one service; the tables must end up as if the
//! notifies had been serialized.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    use hx_01_routing::test_utils::FixedTimeSource;
    use hx_01_routing::{
        Identifier, NodeRecord, OverlayRoutingApi, RoutingConfig, RoutingService, SubTableKind,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::integration::{init_tracing, make_addr, random_peers};

    #[test]
    fn test_parallel_notifies_keep_tables_consistent() {
        init_tracing();
        let config = RoutingConfig {
            dimensions: 4,
            digits_count: 8,
            ns_size: 8,
            use_secure_routing: true,
            ..RoutingConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(50);
        let local = NodeRecord::new(Identifier::random(4, 8, &mut rng).unwrap(), make_addr(7000));
        let service = Arc::new(
            RoutingService::new(local.clone(), config, Box::new(FixedTimeSource::new(1)))
                .expect("valid config"),
        );

        const THREADS: usize = 50;
        const PER_THREAD: usize = 1;
        let peers = random_peers(&local, THREADS * PER_THREAD, &mut rng);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = peers
            .chunks(PER_THREAD)
            .map(|chunk| {
                let chunk = chunk.to_vec();
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for peer in chunk {
                        service.notify(peer.id().clone(), peer.addr());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("notify thread panicked");
        }

        let stats = service.placement_stats();
        assert_eq!(stats.considered, (THREADS * PER_THREAD) as u64);
        assert_eq!(stats.skipped, 0);

        let table = service.routing_table().lock_for_read();
        assert_eq!(table.get(SubTableKind::Ns).len(), 8);
        for kind in SubTableKind::ALL {
            let sub = table.get(kind);
            let hashes: HashSet<u64> = sub.entries().map(|e| e.hash()).collect();
            assert_eq!(hashes.len(), sub.len(), "duplicate entry in {kind}");
            for entry in sub.entries() {
                let slot = entry.slot();
                assert!(sub.slot(slot.level, slot.column).len() <= sub.capacity());
            }
        }
    }

    #[test]
    fn test_same_peer_from_many_threads_is_stored_once() {
        let config = RoutingConfig::for_testing();
        let local = NodeRecord::new(
            Identifier::from_digits(2, 4, &[0, 0, 0, 0]).unwrap(),
            make_addr(7000),
        );
        let service = Arc::new(
            RoutingService::new(local, config, Box::new(FixedTimeSource::new(1)))
                .expect("valid config"),
        );
        let peer = Identifier::from_digits(2, 4, &[0, 0, 3, 1]).unwrap();

        thread::scope(|scope| {
            for _ in 0..8 {
                let service = &service;
                let peer = peer.clone();
                scope.spawn(move || service.notify(peer, make_addr(9000)));
            }
        });

        let hash = peer.calculate_hash();
        let entries = service.entries_by_id_hash(hash);
        let tables: HashSet<SubTableKind> = entries.iter().map(|e| e.slot().table).collect();
        assert_eq!(tables.len(), entries.len());
        let stats = service.placement_stats();
        assert_eq!(stats.considered + stats.skipped, 8);
        assert_eq!(stats.admitted as usize, entries.len());
    }
}
