//! Bitwise and modular arithmetic on identifiers.

use std::cmp::Ordering;

use bitvec::prelude::*;

use crate::error::IdentifierError;
use crate::identifier::{Bits, Identifier};

impl Identifier {
    /// Bitwise XOR of two identifiers of the same shape.
    pub fn xor(&self, other: &Identifier) -> Result<Identifier, IdentifierError> {
        self.zip_words(other, |a, b| a ^ b)
    }

    /// Bitwise AND of two identifiers of the same shape.
    pub fn and(&self, other: &Identifier) -> Result<Identifier, IdentifierError> {
        self.zip_words(other, |a, b| a & b)
    }

    /// Add one unit at `digit` of coordinate `dimension`, wrapping around.
    ///
    /// The carry propagates toward digit 0 (the most significant position);
    /// no other coordinate is touched.
    pub fn add_in_dimension(
        &self,
        dimension: usize,
        digit: usize,
    ) -> Result<Identifier, IdentifierError> {
        self.step_in_dimension(dimension, digit, true)
    }

    /// Subtract one unit at `digit` of coordinate `dimension`, wrapping around.
    pub fn sub_in_dimension(
        &self,
        dimension: usize,
        digit: usize,
    ) -> Result<Identifier, IdentifierError> {
        self.step_in_dimension(dimension, digit, false)
    }

    /// Number of leading digits equal in both identifiers.
    ///
    /// Identifiers of different digit counts are compared over the shorter
    /// one; different dimension counts are an error.
    pub fn common_prefix_length(&self, other: &Identifier) -> Result<usize, IdentifierError> {
        if self.dimensions() != other.dimensions() {
            return Err(IdentifierError::DimensionMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            });
        }
        let digits = self.digits_count().min(other.digits_count());
        Ok((0..digits)
            .take_while(|&d| self.digit_bits(d) == other.digit_bits(d))
            .count())
    }

    fn zip_words(
        &self,
        other: &Identifier,
        op: impl Fn(u64, u64) -> u64,
    ) -> Result<Identifier, IdentifierError> {
        self.ensure_same_shape(other)?;
        let mut out = self.clone();
        let words = out.bits.as_raw_mut_slice();
        for (word, rhs) in words.iter_mut().zip(other.bits.as_raw_slice()) {
            *word = op(*word, *rhs);
        }
        Ok(out)
    }

    fn step_in_dimension(
        &self,
        dimension: usize,
        digit: usize,
        increment: bool,
    ) -> Result<Identifier, IdentifierError> {
        if dimension >= self.dimensions() {
            return Err(IdentifierError::IndexOutOfRange {
                what: "coordinate",
                index: dimension,
                limit: self.dimensions(),
            });
        }
        if digit >= self.digits_count() {
            return Err(IdentifierError::IndexOutOfRange {
                what: "digit",
                index: digit,
                limit: self.digits_count(),
            });
        }

        let mut out = self.clone();
        // an increment flips trailing ones to zero until it meets a zero,
        // a decrement flips trailing zeros to one until it meets a one
        for d in (0..=digit).rev() {
            let index = out.index(d, dimension);
            let bit = out.bits[index];
            out.bits.set(index, !bit);
            if bit != increment {
                break;
            }
        }
        Ok(out)
    }
}

/// `(to - from) mod 2^n` for two MSB-first bit strings of equal length.
pub(crate) fn wrapping_sub(to: &BitSlice<u64, Msb0>, from: &BitSlice<u64, Msb0>) -> Bits {
    let mut out = Bits::repeat(false, to.len());
    let mut borrow = false;
    for i in (0..to.len()).rev() {
        let (a, b) = (to[i], from[i]);
        out.set(i, a ^ b ^ borrow);
        borrow = (!a & b) | (!(a ^ b) & borrow);
    }
    out
}

/// Numeric comparison of two MSB-first bit strings of equal length.
pub(crate) fn compare_bits(a: &BitSlice<u64, Msb0>, b: &BitSlice<u64, Msb0>) -> Ordering {
    a.iter()
        .by_vals()
        .zip(b.iter().by_vals())
        .find(|(x, y)| x != y)
        .map_or(Ordering::Equal, |(x, _)| if x { Ordering::Greater } else { Ordering::Less })
}

/// Forward and backward torus displacement from `from` to `to`.
pub(crate) fn torus_deltas(from: &BitSlice<u64, Msb0>, to: &BitSlice<u64, Msb0>) -> (Bits, Bits) {
    (wrapping_sub(to, from), wrapping_sub(from, to))
}
