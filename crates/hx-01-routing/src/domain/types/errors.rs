//! Domain errors for overlay routing.
//!
//! Placement never fails: collisions, conflicts and selector declines are
//! reported as values (`NotifyOutcome`). The errors here cover configuration
//! faults and maintenance calls that name a peer or table explicitly.

use hx_identifier::{IdentifierError, Shape};
use thiserror::Error;

use super::value_objects::SubTableKind;

/// Configuration faults, caught before any table is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `dimensions` / `digits_count` outside the identifier limits.
    #[error("invalid identifier shape: {0}")]
    Shape(#[from] IdentifierError),

    /// A capacity or interval configured as zero.
    #[error("{field} must be at least 1")]
    ZeroCapacity {
        /// Offending field.
        field: &'static str,
    },

    /// Digit values or orthant numbers would not fit the machine word.
    #[error("{feature} needs dimensions <= {max}, got {dimensions}")]
    TooManyDimensions {
        /// What needs the narrow digits.
        feature: &'static str,
        /// Configured dimensions.
        dimensions: usize,
        /// Largest supported value.
        max: usize,
    },

    /// A selector tunable out of its valid range.
    #[error("invalid {name}: {reason}")]
    InvalidTunable {
        /// Tunable name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Config file could not be read.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// Config document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Errors surfaced by routing-table and service calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Identifier arithmetic failed.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// The local identifier does not have the configured shape.
    #[error("local identifier has shape {actual}, config expects {expected}")]
    LocalShape {
        /// Shape from the configuration.
        expected: Shape,
        /// Shape of the local identifier.
        actual: Shape,
    },

    /// No entry with this hash lives in the named sub-table.
    #[error("peer {hash:#018x} not found in {table}")]
    PeerNotFound {
        /// Identifier hash that was looked up.
        hash: u64,
        /// Sub-table that was searched.
        table: SubTableKind,
    },
}
