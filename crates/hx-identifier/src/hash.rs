//! 64-bit identifier summary used as the routing-table map key.

use std::hash::Hasher;

use bitvec::prelude::*;
use siphasher::sip::SipHasher13;

use crate::identifier::Identifier;

/// Second SipHash key; the first is derived from the identifier shape.
const HASH_KEY: u64 = 0x6878_5f69_6465_6e74;

impl Identifier {
    /// Fold every storage cell through a running checksum.
    ///
    /// Coordinate cells are folded when `dimensions <= digits_count`, digit
    /// cells otherwise. Distinct identifiers may collide; callers compare
    /// full identifiers when it matters.
    pub fn calculate_hash(&self) -> u64 {
        let seed = ((self.dimensions() as u64) << 32) | self.digits_count() as u64;
        let mut hasher = SipHasher13::new_with_keys(seed, HASH_KEY);
        if self.dimensions() <= self.digits_count() {
            for c in 0..self.dimensions() {
                fold_cell(&mut hasher, &self.coordinate_bits(c));
            }
        } else {
            for d in 0..self.digits_count() {
                fold_cell(&mut hasher, self.digit_bits(d));
            }
        }
        hasher.finish()
    }
}

fn fold_cell(hasher: &mut SipHasher13, cell: &BitSlice<u64, Msb0>) {
    for chunk in cell.chunks(64) {
        hasher.write_u64(chunk.load_be::<u64>());
    }
}
