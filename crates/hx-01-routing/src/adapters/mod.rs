//! # Adapters
//!
//! - `SystemTimeSource` - Production time source using the system clock
//! - `StaticConfigProvider` - Config held in memory
//! - `TomlConfigProvider` - Config file loading (requires "toml-config" feature)

/// Configuration providers
pub mod config;
/// Time source adapters
pub mod time;

// Re-export public API
pub use config::StaticConfigProvider;
pub use time::SystemTimeSource;

#[cfg(feature = "toml-config")]
pub use config::TomlConfigProvider;

#[cfg(test)]
mod tests;
