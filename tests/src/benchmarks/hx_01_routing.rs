//! # Routing Benchmarks
//!
//! Notify throughput against tables of increasing fill, per selector.

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use hx_01_routing::{
    Identifier, NodeRecord, NsSelectorKind, PlacementEngine, RoutingConfig, Timestamp,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use std::time::Duration;

fn make_peers(count: usize, rng: &mut StdRng) -> Vec<NodeRecord> {
    (0..count)
        .map(|i| {
            let id = Identifier::random(4, 32, rng).unwrap();
            let port = 10_000 + (i % 50_000) as u16;
            NodeRecord::new(id, SocketAddr::from(([10, 0, 0, 1], port)))
        })
        .collect()
}

fn make_engine(config: RoutingConfig, rng: &mut StdRng) -> PlacementEngine {
    let local = NodeRecord::new(
        Identifier::random(4, 32, rng).unwrap(),
        SocketAddr::from(([10, 0, 0, 0], 7000)),
    );
    PlacementEngine::new(local, config).unwrap()
}

pub fn bench_notify(c: &mut Criterion) {
    let mut group = c.benchmark_group("hx-01/notify");
    group.measurement_time(Duration::from_secs(10));

    let selectors = [
        NsSelectorKind::Simple,
        NsSelectorKind::Distance,
        NsSelectorKind::BalancedOrthants,
        NsSelectorKind::AvgDistEvenness,
        NsSelectorKind::Liveness,
    ];
    for kind in selectors {
        for count in [100usize, 1_000] {
            let mut rng = StdRng::seed_from_u64(count as u64);
            let peers = make_peers(count, &mut rng);
            let config = RoutingConfig {
                ns_selector: kind,
                ..RoutingConfig::default()
            };

            group.throughput(Throughput::Elements(count as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}"), count),
                &peers,
                |b, peers| {
                    b.iter_batched(
                        || make_engine(config.clone(), &mut StdRng::seed_from_u64(0)),
                        |engine| {
                            for peer in peers {
                                black_box(engine.notify(peer.clone(), Timestamp::new(1)));
                            }
                        },
                        criterion::BatchSize::LargeInput,
                    )
                },
            );
        }
    }

    group.finish();
}

pub fn bench_secure_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hx-01/secure");
    let mut rng = StdRng::seed_from_u64(5);
    let peers = make_peers(500, &mut rng);
    let config = RoutingConfig {
        use_secure_routing: true,
        ..RoutingConfig::default()
    };

    group.throughput(Throughput::Elements(peers.len() as u64));
    group.bench_function("notify_500", |b| {
        b.iter_batched(
            || make_engine(config.clone(), &mut StdRng::seed_from_u64(0)),
            |engine| {
                for peer in &peers {
                    black_box(engine.notify(peer.clone(), Timestamp::new(1)));
                }
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_notify(c);
    bench_secure_routing(c);
}
