//! # Hypercube Overlay Routing
//!
//! Routing state of a structured peer-to-peer overlay whose identifier space
//! is a hypercube: every identifier is a sequence of digits, each digit
//! holding one bit per dimension.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** routing table, slot selectors, placement engine
//! - **Ports Layer:** the driving API and the clock/config sources it needs
//! - **Service Layer:** wires the domain to the ports
//! - **Adapters Layer:** system clock, static and TOML configuration
//!
//! | Module | Contents |
//! |--------|----------|
//! | `domain::routing_table` | NS, RT1, RT2, SecRT1, SecRT2 and their slots |
//! | `domain::selectors` | Simple, Distance, Balanced, Evenness, Secure, Liveness |
//! | `domain::placement` | Notify gate, RT1/RT2 adjacency, placement reports |
//! | `service` | `RoutingService` implementing `OverlayRoutingApi` |
//! | `adapters` | `SystemTimeSource`, `StaticConfigProvider`, `TomlConfigProvider` |
//!
//! ## Example
//!
//! ```rust
//! use hx_01_routing::{Identifier, NodeRecord, PlacementEngine, RoutingConfig, Timestamp};
//!
//! let config = RoutingConfig::for_testing();
//! let local = NodeRecord::new(
//!     Identifier::from_digits(2, 4, &[0, 0, 0, 0]).unwrap(),
//!     "10.0.0.1:7000".parse().unwrap(),
//! );
//! let engine = PlacementEngine::new(local, config).unwrap();
//!
//! let peer = NodeRecord::new(
//!     Identifier::from_digits(2, 4, &[0, 0, 0, 1]).unwrap(),
//!     "10.0.0.2:7000".parse().unwrap(),
//! );
//! let outcome = engine.notify(peer, Timestamp::new(1_000));
//!
//! let report = outcome.report().unwrap();
//! assert!(report.ns.is_admitted());
//! assert!(report.rt1.is_admitted());
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// ADAPTERS
// =============================================================================

/// Clock and configuration adapters.
/// `TomlConfigProvider` requires feature: `toml-config`
pub mod adapters;

/// Test utilities (FixedTimeSource).
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use domain::*;
pub use ports::*;
pub use service::RoutingService;

pub use hx_identifier::{Identifier, Metric, Shape};
