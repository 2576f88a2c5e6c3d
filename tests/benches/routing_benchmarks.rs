//! # Hypercube Overlay Benchmarks
//!
//! | Crate | Benchmark |
//! |-------|-----------|
//! | hx-identifier | Distance per metric and shape, prefix, orthant, hash |
//! | hx-01-routing | Notify throughput per NS selector, secure routing |

use criterion::{criterion_group, criterion_main};
use hx_tests::benchmarks::{hx_01_routing, hx_identifier};

criterion_group!(
    benches,
    hx_identifier::register_benchmarks,
    hx_01_routing::register_benchmarks,
);

criterion_main!(benches);
