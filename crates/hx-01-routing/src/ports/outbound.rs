//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this subsystem **requires** the host
//! application to implement.

use crate::domain::{RoutingConfig, Timestamp};

/// Abstract interface for time.
///
/// Allows deterministic testing by injecting mock time.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct SystemTimeSource;
///
/// impl TimeSource for SystemTimeSource {
///     fn now(&self) -> Timestamp {
///         let elapsed = std::time::SystemTime::now()
///             .duration_since(std::time::UNIX_EPOCH)
///             .unwrap_or_default();
///         Timestamp::new(elapsed.as_millis() as u64)
///     }
/// }
/// ```
pub trait TimeSource: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

/// Abstract interface for configuration loading.
///
/// Allows different configuration sources (file, environment, etc.)
pub trait ConfigProvider: Send + Sync {
    /// Routing configuration to build the engine with.
    fn routing_config(&self) -> RoutingConfig;
}
