//! # Hypercube Identifier Space
//!
//! Fixed-width identifiers made of `dimensions` coordinates, each
//! `digits_count` digits wide. Equivalently, `digits_count` digits, each
//! `dimensions` bits wide.
//!
//! ## Contents
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `identifier` | Storage, digit/coordinate views, setters, random generation |
//! | `ops` | XOR / AND, per-dimension carry arithmetic, common prefix |
//! | `metric` | Manhattan, Euclidean, Chebyshev, Ring; Steinhaus transform |
//! | `geometry` | Orthant and semiring numbers, spherical projection |
//! | `codec` | Big/little-endian byte encoding, `byte_length` |
//! | `hash` | 64-bit identifier hash for table lookups |
//!
//! ## Example
//!
//! ```rust
//! use hx_identifier::{distance, ByteOrder, Identifier, Metric};
//!
//! let a = Identifier::from_digits(2, 3, &[0, 0, 0]).unwrap();
//! let b = Identifier::from_digits(2, 3, &[1, 1, 3]).unwrap();
//!
//! // b is one step behind a on axis 0 (0b111) and one ahead on axis 1 (0b001)
//! assert_eq!(a.common_prefix_length(&b).unwrap(), 0);
//! assert_eq!(distance(&a, &b, Metric::Manhattan, None).unwrap(), 2.0);
//!
//! let bytes = b.to_bytes(ByteOrder::BigEndian);
//! assert_eq!(Identifier::from_bytes(&bytes, 2, 3, ByteOrder::BigEndian).unwrap(), b);
//! ```

mod codec;
mod error;
mod geometry;
mod hash;
mod identifier;
mod metric;
mod ops;

pub use codec::{byte_length, ByteOrder, PACKED_MAX_DIMENSIONS};
pub use error::IdentifierError;
pub use geometry::{
    orthant_number, semiring_number, spherical_projection_distance, MAX_ORTHANT_DIMENSIONS,
};
pub use identifier::{Identifier, Shape, INT_BITS, MAX_SHAPE};
pub use metric::{distance, Metric};

/// Re-exported so callers can hand bit strings to [`Identifier::set_id`].
pub use bitvec;

#[cfg(test)]
mod tests;
