//! Fixed-length byte encoding of identifiers.
//!
//! Two layouts share one length function, [`byte_length`]:
//!
//! - **packed** (`dimensions <= 4`): `8 / dimensions` digits per byte, the
//!   first digit of a byte in its high bits.
//! - **general** (`dimensions > 4`): every digit spans `ceil(dimensions / 8)`
//!   bytes, most significant byte first.
//!
//! Big-endian puts digit 0 first. Little-endian is the exact byte reversal
//! of the big-endian form. Unused bits must be zero on decode.

use crate::error::IdentifierError;
use crate::identifier::{Identifier, Shape};

/// Widest digit stored with several digits per byte.
pub const PACKED_MAX_DIMENSIONS: usize = 4;

/// Byte order of an encoded identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Digit 0 in the first byte.
    #[default]
    BigEndian,
    /// Digit 0 in the last byte.
    LittleEndian,
}

/// Encoded length of an identifier of the given shape.
///
/// Returns 0 for shapes with a zero component.
pub fn byte_length(dimensions: usize, digits_count: usize) -> usize {
    if dimensions == 0 || digits_count == 0 {
        return 0;
    }
    if dimensions <= PACKED_MAX_DIMENSIONS {
        digits_count.div_ceil(8 / dimensions)
    } else {
        digits_count * dimensions.div_ceil(8)
    }
}

impl Identifier {
    /// Encode into exactly `byte_length(dimensions, digits_count)` bytes.
    pub fn to_bytes(&self, order: ByteOrder) -> Vec<u8> {
        let dims = self.dimensions();
        let mut out = vec![0u8; byte_length(dims, self.digits_count())];

        if dims <= PACKED_MAX_DIMENSIONS {
            let per_byte = 8 / dims;
            for d in 0..self.digits_count() {
                // digit_word fits a byte here
                out[d / per_byte] |= (self.digit_word(d) as u8) << packed_shift(dims, d);
            }
        } else {
            let width = dims.div_ceil(8);
            for d in 0..self.digits_count() {
                let base = d * width;
                for c in (0..dims).filter(|&c| self.bits[self.index(d, c)]) {
                    out[base + width - 1 - c / 8] |= 1 << (c % 8);
                }
            }
        }

        if order == ByteOrder::LittleEndian {
            out.reverse();
        }
        out
    }

    /// Decode bytes produced by [`Identifier::to_bytes`].
    pub fn from_bytes(
        bytes: &[u8],
        dimensions: usize,
        digits_count: usize,
        order: ByteOrder,
    ) -> Result<Identifier, IdentifierError> {
        let shape = Shape::new(dimensions, digits_count)?;
        let expected = byte_length(dimensions, digits_count);
        if bytes.len() != expected {
            return Err(IdentifierError::ByteLength {
                expected,
                actual: bytes.len(),
            });
        }

        let mut buf = bytes.to_vec();
        if order == ByteOrder::LittleEndian {
            buf.reverse();
        }

        let mut id = Identifier::with_shape(shape);
        if dimensions <= PACKED_MAX_DIMENSIONS {
            let per_byte = 8 / dimensions;
            let mask = (1u8 << dimensions) - 1;
            let mut used = vec![0u8; expected];
            for d in 0..digits_count {
                let shift = packed_shift(dimensions, d);
                let value = (buf[d / per_byte] >> shift) & mask;
                used[d / per_byte] |= mask << shift;
                for c in 0..dimensions {
                    let index = id.index(d, c);
                    id.bits.set(index, (value >> c) & 1 == 1);
                }
            }
            if buf.iter().zip(&used).any(|(byte, used)| byte & !used != 0) {
                return Err(IdentifierError::NonCanonicalPadding);
            }
        } else {
            let width = dimensions.div_ceil(8);
            let spare = width * 8 - dimensions;
            for d in 0..digits_count {
                let base = d * width;
                if spare > 0 && buf[base] >> (8 - spare) != 0 {
                    return Err(IdentifierError::NonCanonicalPadding);
                }
                for c in 0..dimensions {
                    let bit = (buf[base + width - 1 - c / 8] >> (c % 8)) & 1 == 1;
                    let index = id.index(d, c);
                    id.bits.set(index, bit);
                }
            }
        }
        Ok(id)
    }
}

/// Left shift of digit `d` inside its byte in the packed layout.
fn packed_shift(dimensions: usize, d: usize) -> usize {
    8 - dimensions * (d % (8 / dimensions) + 1)
}
