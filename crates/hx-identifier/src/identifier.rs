//! Packed hypercube identifier.
//!
//! An identifier is `dimensions × digits_count` bits. It can be read two ways:
//!
//! - **by digit**: `digits_count` groups of `dimensions` bits. Digit 0 is the
//!   most significant and digit prefixes name hypercubes.
//! - **by coordinate**: `dimensions` groups of `digits_count` bits, one per
//!   axis of the torus.
//!
//! Both views are derived from a single bit vector, so they cannot drift
//! apart. Bit `(d, c)` (digit `d`, dimension `c`) lives at index
//! `d * dimensions + c`. Within a digit value, dimension `c` is bit `c`.
//! Within a coordinate value, digit `d` is bit `digits_count - 1 - d`.

use std::fmt;

use bitvec::prelude::*;
use rand::RngCore;

use crate::codec::ByteOrder;
use crate::error::IdentifierError;

/// Upper bound for both `dimensions` and `digits_count`.
pub const MAX_SHAPE: usize = 1024;

/// Integer width used by [`Identifier::digit_as_int`].
pub const INT_BITS: u32 = u64::BITS;

/// Canonical storage: bit `i` of the identifier in storage order.
pub(crate) type Bits = BitVec<u64, Msb0>;

/// The `(dimensions, digits_count)` pair every identifier is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shape {
    dimensions: usize,
    digits_count: usize,
}

impl Shape {
    /// Validate and build a shape.
    pub fn new(dimensions: usize, digits_count: usize) -> Result<Self, IdentifierError> {
        let valid = |v: usize| (1..=MAX_SHAPE).contains(&v);
        if !valid(dimensions) || !valid(digits_count) {
            return Err(IdentifierError::InvalidShape {
                dimensions,
                digits_count,
            });
        }
        Ok(Self {
            dimensions,
            digits_count,
        })
    }

    /// Bits per digit.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Digits per identifier (bits per coordinate).
    pub fn digits_count(&self) -> usize {
        self.digits_count
    }

    /// Total number of bits.
    pub fn num_bits(&self) -> usize {
        self.dimensions * self.digits_count
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.dimensions, self.digits_count)
    }
}

/// A point of the hypercube identifier space.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    shape: Shape,
    pub(crate) bits: Bits,
}

impl Identifier {
    /// The all-zero identifier of the given shape.
    pub fn zero(dimensions: usize, digits_count: usize) -> Result<Self, IdentifierError> {
        Ok(Self::with_shape(Shape::new(dimensions, digits_count)?))
    }

    pub(crate) fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            bits: Bits::repeat(false, shape.num_bits()),
        }
    }

    /// Build an identifier from digit values, digit 0 first.
    pub fn from_digits(
        dimensions: usize,
        digits_count: usize,
        digits: &[u64],
    ) -> Result<Self, IdentifierError> {
        let mut id = Self::zero(dimensions, digits_count)?;
        if digits.len() != digits_count {
            return Err(IdentifierError::IndexOutOfRange {
                what: "digit",
                index: digits.len(),
                limit: digits_count,
            });
        }
        for (d, &value) in digits.iter().enumerate() {
            id.set_digit(d, value)?;
        }
        Ok(id)
    }

    /// Draw a uniformly random identifier from `rng`.
    pub fn random<R: RngCore + ?Sized>(
        dimensions: usize,
        digits_count: usize,
        rng: &mut R,
    ) -> Result<Self, IdentifierError> {
        let mut id = Self::zero(dimensions, digits_count)?;
        let mut word = 0u64;
        for i in 0..id.bits.len() {
            if i % 64 == 0 {
                word = rng.next_u64();
            }
            id.bits.set(i, (word >> (i % 64)) & 1 == 1);
        }
        Ok(id)
    }

    /// Shape of this identifier.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Bits per digit.
    pub fn dimensions(&self) -> usize {
        self.shape.dimensions
    }

    /// Number of digits.
    pub fn digits_count(&self) -> usize {
        self.shape.digits_count
    }

    /// Total number of bits.
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// All bits in storage order.
    pub fn as_bits(&self) -> &BitSlice<u64, Msb0> {
        &self.bits
    }

    /// Bit `i` in storage order.
    pub fn get(&self, i: usize) -> Result<bool, IdentifierError> {
        self.bits
            .get(i)
            .map(|bit| *bit)
            .ok_or(IdentifierError::IndexOutOfRange {
                what: "bit",
                index: i,
                limit: self.bits.len(),
            })
    }

    /// Set bit `i` in storage order.
    pub fn set_bit(&mut self, i: usize, value: bool) -> Result<(), IdentifierError> {
        check_index("bit", i, self.bits.len())?;
        self.bits.set(i, value);
        Ok(())
    }

    /// Replace every bit of the identifier.
    pub fn set_id<T: BitStore, O: BitOrder>(
        &mut self,
        bits: &BitSlice<T, O>,
    ) -> Result<(), IdentifierError> {
        if bits.len() != self.bits.len() {
            return Err(IdentifierError::BitLength {
                expected: self.bits.len(),
                actual: bits.len(),
            });
        }
        for (i, bit) in bits.iter().by_vals().enumerate() {
            self.bits.set(i, bit);
        }
        Ok(())
    }

    /// Digit `d` as a double. Digits may be wider than any machine word.
    pub fn digit(&self, d: usize) -> Result<f64, IdentifierError> {
        check_index("digit", d, self.digits_count())?;
        // dimension 0 is the least significant bit of the digit
        Ok(self
            .digit_bits(d)
            .iter()
            .by_vals()
            .rev()
            .fold(0.0, |acc, bit| acc * 2.0 + f64::from(u8::from(bit))))
    }

    /// Digit `d` as an integer.
    ///
    /// Fails with [`IdentifierError::Overflow`] when `dimensions >= 64`.
    pub fn digit_as_int(&self, d: usize) -> Result<u64, IdentifierError> {
        if self.dimensions() >= INT_BITS as usize {
            return Err(IdentifierError::Overflow {
                dimensions: self.dimensions(),
                width: INT_BITS,
            });
        }
        check_index("digit", d, self.digits_count())?;
        Ok(self.digit_word(d))
    }

    /// Overwrite digit `d`.
    pub fn set_digit(&mut self, d: usize, value: u64) -> Result<(), IdentifierError> {
        check_index("digit", d, self.digits_count())?;
        check_fits(value, self.dimensions())?;
        for c in 0..self.dimensions() {
            let bit = c < 64 && (value >> c) & 1 == 1;
            let index = self.index(d, c);
            self.bits.set(index, bit);
        }
        Ok(())
    }

    /// Coordinate `c` as a double. Values beyond `f64` range saturate.
    pub fn coordinate(&self, c: usize) -> Result<f64, IdentifierError> {
        check_index("coordinate", c, self.dimensions())?;
        Ok(bits_to_f64(&self.coordinate_bits(c)))
    }

    /// Overwrite coordinate `c`.
    pub fn set_coordinate(&mut self, c: usize, value: u64) -> Result<(), IdentifierError> {
        check_index("coordinate", c, self.dimensions())?;
        check_fits(value, self.digits_count())?;
        let digits = self.digits_count();
        for d in 0..digits {
            let position = digits - 1 - d;
            let bit = position < 64 && (value >> position) & 1 == 1;
            let index = self.index(d, c);
            self.bits.set(index, bit);
        }
        Ok(())
    }

    /// The first `digits_count` digits of this identifier.
    pub fn truncated(&self, digits_count: usize) -> Result<Identifier, IdentifierError> {
        let shape = Shape::new(self.dimensions(), digits_count)?;
        if digits_count > self.digits_count() {
            return Err(IdentifierError::ShapeMismatch {
                left: self.shape,
                right: shape,
            });
        }
        let mut out = Self::with_shape(shape);
        out.bits.copy_from_bitslice(&self.bits[..shape.num_bits()]);
        Ok(out)
    }

    /// Number of set bits in digit `d`.
    pub fn digit_ones(&self, d: usize) -> Result<usize, IdentifierError> {
        check_index("digit", d, self.digits_count())?;
        Ok(self.digit_bits(d).count_ones())
    }

    /// Bit for dimension `c` of digit `d`.
    pub fn digit_bit(&self, d: usize, c: usize) -> Result<bool, IdentifierError> {
        check_index("digit", d, self.digits_count())?;
        check_index("coordinate", c, self.dimensions())?;
        Ok(self.bits[self.index(d, c)])
    }

    // ------------------------------------------------------------------
    // crate-internal accessors, indices already validated by the caller
    // ------------------------------------------------------------------

    #[inline]
    pub(crate) fn index(&self, d: usize, c: usize) -> usize {
        d * self.shape.dimensions + c
    }

    pub(crate) fn digit_bits(&self, d: usize) -> &BitSlice<u64, Msb0> {
        let dims = self.shape.dimensions;
        &self.bits[d * dims..(d + 1) * dims]
    }

    /// Low 64 bits of digit `d`.
    pub(crate) fn digit_word(&self, d: usize) -> u64 {
        self.digit_bits(d)
            .iter()
            .by_vals()
            .take(64)
            .enumerate()
            .fold(0u64, |acc, (c, bit)| acc | (u64::from(bit) << c))
    }

    /// Coordinate `c` as an MSB-first bit string (digit 0 first).
    pub(crate) fn coordinate_bits(&self, c: usize) -> Bits {
        let dims = self.shape.dimensions;
        self.bits
            .iter()
            .by_vals()
            .skip(c)
            .step_by(dims)
            .collect()
    }

    /// The identifier read as one number: digits in order, each digit with
    /// its highest dimension first. Equals the big-endian digit sequence.
    pub(crate) fn ring_bits(&self) -> Bits {
        (0..self.digits_count())
            .flat_map(|d| self.digit_bits(d).iter().by_vals().rev())
            .collect()
    }

    pub(crate) fn ensure_same_shape(&self, other: &Identifier) -> Result<(), IdentifierError> {
        if self.shape != other.shape {
            return Err(IdentifierError::ShapeMismatch {
                left: self.shape,
                right: other.shape,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes(ByteOrder::BigEndian) {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({}:{})", self.shape, self)
    }
}

fn check_index(what: &'static str, index: usize, limit: usize) -> Result<(), IdentifierError> {
    if index >= limit {
        return Err(IdentifierError::IndexOutOfRange { what, index, limit });
    }
    Ok(())
}

fn check_fits(value: u64, bits: usize) -> Result<(), IdentifierError> {
    if bits < 64 && value >> bits != 0 {
        return Err(IdentifierError::ValueTooWide { value, bits });
    }
    Ok(())
}

/// MSB-first bit string to a double.
pub(crate) fn bits_to_f64(bits: &BitSlice<u64, Msb0>) -> f64 {
    bits.iter()
        .by_vals()
        .fold(0.0, |acc, bit| acc * 2.0 + f64::from(u8::from(bit)))
}
