//! # Overlay Routing Service
//!
//! High-level service implementing the `OverlayRoutingApi` port.
//!
//! This service wraps the domain `PlacementEngine`, stamps notifies with the
//! injected clock and exposes the keep-alive maintenance hooks.

// Semantic submodules
mod api;
mod core;
mod maintenance;

// Re-export public API
pub use core::RoutingService;
