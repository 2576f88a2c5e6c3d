//! Identifier-space errors.
//!
//! Every variant is a construction or operation fault: the caller passed a
//! shape, index or byte string the identifier space cannot represent.
//! Nothing here is ever silently truncated or padded.

use thiserror::Error;

use crate::identifier::Shape;

/// Errors raised by identifier construction, arithmetic and encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IdentifierError {
    /// `dimensions` or `digits_count` outside `1..=1024`.
    #[error("invalid identifier shape: dimensions={dimensions}, digits_count={digits_count}")]
    InvalidShape {
        /// Requested number of dimensions.
        dimensions: usize,
        /// Requested number of digits.
        digits_count: usize,
    },

    /// Two operands must have identical shapes.
    #[error("identifier shapes differ: {left} vs {right}")]
    ShapeMismatch {
        /// Shape of the left operand.
        left: Shape,
        /// Shape of the right operand.
        right: Shape,
    },

    /// Two operands must have the same number of dimensions.
    #[error("identifier dimensions differ: {left} vs {right}")]
    DimensionMismatch {
        /// Dimensions of the left operand.
        left: usize,
        /// Dimensions of the right operand.
        right: usize,
    },

    /// The result would not fit the target integer width.
    #[error("{dimensions} dimensions do not fit a {width}-bit integer")]
    Overflow {
        /// Dimensions of the identifier.
        dimensions: usize,
        /// Usable bits of the target integer.
        width: u32,
    },

    /// Digit, coordinate or bit index out of range.
    #[error("{what} index {index} out of range (limit {limit})")]
    IndexOutOfRange {
        /// Which index kind was out of range.
        what: &'static str,
        /// The offending index.
        index: usize,
        /// Exclusive upper bound.
        limit: usize,
    },

    /// A digit or coordinate value wider than its cell.
    #[error("value {value} does not fit in {bits} bits")]
    ValueTooWide {
        /// The rejected value.
        value: u64,
        /// Width of the target cell.
        bits: usize,
    },

    /// Byte string of the wrong length for the requested shape.
    #[error("expected {expected} bytes, got {actual}")]
    ByteLength {
        /// `byte_length(dimensions, digits_count)`.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Bit string of the wrong length for the identifier.
    #[error("expected {expected} bits, got {actual}")]
    BitLength {
        /// Number of bits of the identifier.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Unused bits of an encoded identifier were not zero.
    #[error("non-zero padding bits in encoded identifier")]
    NonCanonicalPadding,

    /// Projection sphere radius must be positive and finite.
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
}
