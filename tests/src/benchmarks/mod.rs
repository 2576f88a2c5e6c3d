//! # Hypercube Overlay Benchmarks
//!
//! Performance benchmarks per crate.

pub mod hx_01_routing;
pub mod hx_identifier;
