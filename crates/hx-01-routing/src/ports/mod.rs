//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** what the network and maintenance
//!   collaborators call into
//! - **Driven Ports (Outbound):** clock and configuration sources the host
//!   provides

pub mod inbound;
pub mod outbound;

pub use inbound::OverlayRoutingApi;
pub use outbound::{ConfigProvider, TimeSource};
