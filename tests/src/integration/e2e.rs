//! # End-to-End Routing Scenarios
//!
//! A single service fed random peers, checked through the public API only.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use hx_01_routing::adapters::StaticConfigProvider;
    use hx_01_routing::test_utils::FixedTimeSource;
    use hx_01_routing::{
        Identifier, NodeRecord, NotifyOutcome, NsSelectorKind, OverlayRoutingApi, RoutingConfig,
        RoutingService, SubTableKind,
    };
    use hx_identifier::orthant_number;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::integration::{init_tracing, make_addr, random_peers};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn small_config() -> RoutingConfig {
        RoutingConfig {
            dimensions: 4,
            digits_count: 8,
            ns_size: 4,
            routing_table_slot_size: 2,
            ..RoutingConfig::default()
        }
    }

    fn make_service(local: NodeRecord, config: RoutingConfig) -> RoutingService {
        let provider = StaticConfigProvider::new().with_config(config);
        RoutingService::from_provider(local, &provider, Box::new(FixedTimeSource::new(10_000)))
            .expect("valid config")
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_random_peers_fill_tables_within_bounds() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(2024);
        let local = NodeRecord::new(Identifier::random(4, 8, &mut rng).unwrap(), make_addr(7000));
        let service = make_service(local.clone(), small_config());

        let peers = random_peers(&local, 10, &mut rng);
        for peer in &peers {
            let outcome = service.notify(peer.id().clone(), peer.addr());
            assert!(matches!(outcome, NotifyOutcome::Processed(_)));
        }

        let stats = service.get_stats();
        assert_eq!(stats.ns.entries, 4);
        tracing::info!(?stats, "tables after ten peers");

        let mut per_slot: HashMap<_, usize> = HashMap::new();
        for entry in service.all_entries() {
            *per_slot.entry(entry.slot()).or_default() += 1;
            assert_eq!(entry.created_at().as_millis(), 10_000);
        }
        for (slot, count) in &per_slot {
            let limit = if slot.table == SubTableKind::Ns { 4 } else { 2 };
            assert!(*count <= limit, "{slot:?} holds {count}");
        }

        let by_hash: usize = peers
            .iter()
            .map(|p| service.entries_by_id_hash(p.hash()).len())
            .sum();
        assert_eq!(by_hash, stats.total_entries());
        for peer in &peers {
            let entries = service.entries_by_id_hash(peer.hash());
            assert!(entries.len() <= SubTableKind::ALL.len());
            assert!(entries.iter().all(|e| e.id() == peer.id()));
        }
    }

    #[test]
    fn test_removed_peer_is_gone_everywhere() {
        let mut rng = StdRng::seed_from_u64(7);
        let local = NodeRecord::new(Identifier::random(4, 8, &mut rng).unwrap(), make_addr(7000));
        let service = make_service(local.clone(), small_config());

        let peers = random_peers(&local, 6, &mut rng);
        service.recovery_reply(peers.clone());

        let target = service.all_entries()[0].hash();
        let before = service.entries_by_id_hash(target).len();
        let removed = service.remove_peer(target);

        assert_eq!(removed.len(), before);
        assert!(service.entries_by_id_hash(target).is_empty());
        assert!(service.all_entries().iter().all(|e| e.hash() != target));
    }

    #[test]
    fn test_balanced_orthants_spread_neighborhood() {
        init_tracing();
        let config = RoutingConfig {
            dimensions: 2,
            digits_count: 8,
            ns_size: 8,
            ns_selector: NsSelectorKind::BalancedOrthants,
            use_rt1: false,
            use_rt2: false,
            ..RoutingConfig::default()
        };
        let mut center = Identifier::zero(2, 8).unwrap();
        center.set_coordinate(0, 128).unwrap();
        center.set_coordinate(1, 128).unwrap();
        let local = NodeRecord::new(center, make_addr(7000));
        let service = make_service(local.clone(), config);

        let mut rng = StdRng::seed_from_u64(99);
        for peer in random_peers(&local, 200, &mut rng) {
            service.notify(peer.id().clone(), peer.addr());
        }

        let mut counts = [0usize; 4];
        for entry in service.all_entries() {
            let orthant = orthant_number(local.id(), entry.id()).unwrap();
            counts[orthant as usize] += 1;
        }
        let max = counts.iter().max().copied().unwrap_or(0);
        let min = counts.iter().min().copied().unwrap_or(0);
        assert_eq!(counts.iter().sum::<usize>(), 8);
        assert!(max - min <= 1, "orthant counts {counts:?}");
    }
}
