//! # Hypercube Overlay Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion benchmarks per crate
//! │   ├── hx_identifier.rs
//! │   └── hx_01_routing.rs
//! │
//! └── integration/      # Whole-service scenarios
//!     ├── e2e.rs
//!     └── concurrency.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p hx-tests
//!
//! # By category
//! cargo test -p hx-tests integration::
//!
//! # Benchmarks
//! cargo bench -p hx-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod benchmarks;
pub mod integration;
