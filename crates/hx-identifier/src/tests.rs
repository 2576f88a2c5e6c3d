//! Tests for the identifier space.

use std::f64::consts::{FRAC_PI_2, PI};

use bitvec::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

/// 2 dimensions × 3 digits: coordinates range over 0..8.
fn point(c0: u64, c1: u64) -> Identifier {
    let mut id = Identifier::zero(2, 3).unwrap();
    id.set_coordinate(0, c0).unwrap();
    id.set_coordinate(1, c1).unwrap();
    id
}

fn point4(c0: u64, c1: u64) -> Identifier {
    let mut id = Identifier::zero(2, 4).unwrap();
    id.set_coordinate(0, c0).unwrap();
    id.set_coordinate(1, c1).unwrap();
    id
}

// =============================================================================
// Construction and views
// =============================================================================

#[test]
fn test_rejects_invalid_shapes() {
    assert!(matches!(
        Identifier::zero(0, 4),
        Err(IdentifierError::InvalidShape { .. })
    ));
    assert!(Identifier::zero(4, 0).is_err());
    assert!(Identifier::zero(1025, 1).is_err());
    assert!(Identifier::zero(1, 1025).is_err());
    assert!(Identifier::zero(1024, 1).is_ok());
}

#[test]
fn test_digit_and_coordinate_views_agree() {
    let id = Identifier::from_digits(3, 4, &[0b101, 0b011, 0b000, 0b110]).unwrap();

    assert_eq!(id.coordinate(0).unwrap(), 12.0); // 0b1100
    assert_eq!(id.coordinate(1).unwrap(), 5.0); // 0b0101
    assert_eq!(id.coordinate(2).unwrap(), 9.0); // 0b1001
    assert_eq!(id.digit(0).unwrap(), 5.0);
    assert_eq!(id.digit_as_int(3).unwrap(), 0b110);
}

#[test]
fn test_set_coordinate_rewrites_digits() {
    let mut id = Identifier::zero(2, 3).unwrap();
    id.set_coordinate(1, 0b101).unwrap();

    assert_eq!(id.digit_as_int(0).unwrap(), 2);
    assert_eq!(id.digit_as_int(1).unwrap(), 0);
    assert_eq!(id.digit_as_int(2).unwrap(), 2);
    assert_eq!(id.coordinate(0).unwrap(), 0.0);
}

#[test]
fn test_setters_reject_values_that_do_not_fit() {
    let mut id = Identifier::zero(3, 2).unwrap();
    assert_eq!(
        id.set_digit(0, 8),
        Err(IdentifierError::ValueTooWide { value: 8, bits: 3 })
    );
    assert!(id.set_coordinate(0, 4).is_err());
    assert!(id.set_coordinate(3, 0).is_err());
    assert!(id.set_digit(2, 0).is_err());
}

#[test]
fn test_digit_as_int_overflows_at_word_width() {
    let wide = Identifier::zero(64, 2).unwrap();
    assert_eq!(
        wide.digit_as_int(0),
        Err(IdentifierError::Overflow {
            dimensions: 64,
            width: 64
        })
    );
    assert_eq!(Identifier::zero(63, 2).unwrap().digit_as_int(1), Ok(0));
}

#[test]
fn test_wide_digit_reads_as_double() {
    let mut id = Identifier::zero(70, 1).unwrap();
    id.set_bit(69, true).unwrap();
    assert_eq!(id.digit(0).unwrap(), 2f64.powi(69));
}

#[test]
fn test_set_id_and_get() {
    let mut id = Identifier::zero(2, 2).unwrap();
    id.set_id(bits![u8, Msb0; 1, 0, 0, 1]).unwrap();

    assert!(id.get(0).unwrap());
    assert!(!id.get(1).unwrap());
    assert!(id.get(3).unwrap());
    assert_eq!(id.digit_as_int(0).unwrap(), 1);
    assert_eq!(id.digit_as_int(1).unwrap(), 2);

    assert!(matches!(id.get(4), Err(IdentifierError::IndexOutOfRange { .. })));
    assert_eq!(
        id.set_id(bits![u8, Msb0; 1, 0]),
        Err(IdentifierError::BitLength {
            expected: 4,
            actual: 2
        })
    );
}

#[test]
fn test_truncated_keeps_leading_digits() {
    let id = Identifier::from_digits(2, 4, &[1, 2, 3, 0]).unwrap();
    let expected = Identifier::from_digits(2, 2, &[1, 2]).unwrap();
    assert_eq!(id.truncated(2).unwrap(), expected);
    assert!(id.truncated(5).is_err());
}

#[test]
fn test_random_is_deterministic_for_a_seed() {
    let a = Identifier::random(5, 40, &mut StdRng::seed_from_u64(7)).unwrap();
    let b = Identifier::random(5, 40, &mut StdRng::seed_from_u64(7)).unwrap();
    let c = Identifier::random(5, 40, &mut StdRng::seed_from_u64(8)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// =============================================================================
// Bitwise and modular arithmetic
// =============================================================================

#[test]
fn test_xor_and_and() {
    let a = Identifier::from_digits(3, 2, &[0b110, 0b011]).unwrap();
    let b = Identifier::from_digits(3, 2, &[0b011, 0b011]).unwrap();

    assert_eq!(
        a.xor(&b).unwrap(),
        Identifier::from_digits(3, 2, &[0b101, 0]).unwrap()
    );
    assert_eq!(
        a.and(&b).unwrap(),
        Identifier::from_digits(3, 2, &[0b010, 0b011]).unwrap()
    );
    assert!(a.xor(&Identifier::zero(3, 3).unwrap()).is_err());
}

#[test]
fn test_add_in_dimension_carries_and_wraps() {
    assert_eq!(point(3, 5).add_in_dimension(0, 2).unwrap(), point(4, 5));
    assert_eq!(point(7, 5).add_in_dimension(0, 2).unwrap(), point(0, 5));
    assert_eq!(point(3, 5).add_in_dimension(0, 1).unwrap(), point(5, 5));
    assert_eq!(point(3, 7).add_in_dimension(1, 0).unwrap(), point(3, 3));
}

#[test]
fn test_sub_in_dimension_borrows_and_wraps() {
    assert_eq!(point(0, 0).sub_in_dimension(0, 2).unwrap(), point(7, 0));
    assert_eq!(point(3, 5).sub_in_dimension(1, 0).unwrap(), point(3, 1));
    assert_eq!(point(4, 2).sub_in_dimension(0, 2).unwrap(), point(3, 2));
    assert!(point(0, 0).sub_in_dimension(2, 0).is_err());
    assert!(point(0, 0).sub_in_dimension(0, 3).is_err());
}

#[test]
fn test_common_prefix_length() {
    let a = Identifier::from_digits(2, 4, &[1, 2, 3, 0]).unwrap();
    let b = Identifier::from_digits(2, 4, &[1, 2, 0, 0]).unwrap();

    assert_eq!(a.common_prefix_length(&b).unwrap(), 2);
    assert_eq!(a.common_prefix_length(&a).unwrap(), 4);
    assert_eq!(
        a.common_prefix_length(&Identifier::zero(3, 4).unwrap()),
        Err(IdentifierError::DimensionMismatch { left: 2, right: 3 })
    );
}

// =============================================================================
// Metrics
// =============================================================================

#[test]
fn test_metrics_use_wrap_around_axes() {
    let a = point(0, 0);
    let b = point(7, 3);

    assert_eq!(distance(&a, &b, Metric::Manhattan, None).unwrap(), 4.0);
    assert_eq!(distance(&a, &b, Metric::Euclidean, None).unwrap(), 10f64.sqrt());
    assert_eq!(distance(&a, &b, Metric::Chebyshev, None).unwrap(), 3.0);
    // digits [1, 3, 3] read as one number: 0b01_11_11 = 31 on a ring of 64
    assert_eq!(distance(&a, &b, Metric::Ring, None).unwrap(), 31.0);
}

#[test]
fn test_ring_follows_digit_values() {
    let zero = Identifier::zero(2, 2).unwrap();
    let last = Identifier::from_digits(2, 2, &[0, 1]).unwrap();
    let first = Identifier::from_digits(2, 2, &[1, 0]).unwrap();
    let far = Identifier::from_digits(2, 2, &[2, 0]).unwrap();

    assert_eq!(distance(&zero, &last, Metric::Ring, None).unwrap(), 1.0);
    assert_eq!(distance(&zero, &first, Metric::Ring, None).unwrap(), 4.0);
    // value 8 is the antipode of a 16-point ring
    assert_eq!(distance(&zero, &far, Metric::Ring, None).unwrap(), 8.0);
}

#[test]
fn test_metric_rejects_mismatched_shapes() {
    let a = point(0, 0);
    let b = Identifier::zero(2, 4).unwrap();
    assert!(matches!(
        distance(&a, &b, Metric::Manhattan, None),
        Err(IdentifierError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_steinhaus_transform() {
    let a = point(0, 0);
    let b = point(7, 3);

    // d(a,A) = 0, d(b,A) = 4, d(a,b) = 4
    assert_eq!(distance(&a, &b, Metric::Manhattan, Some(&a)).unwrap(), 1.0);

    // a longer anchor is cut down to three digits, leaving the origin
    let long_anchor = Identifier::from_digits(2, 5, &[0, 0, 0, 3, 1]).unwrap();
    assert_eq!(
        distance(&a, &b, Metric::Manhattan, Some(&long_anchor)).unwrap(),
        1.0
    );

    let foreign = Identifier::zero(3, 3).unwrap();
    assert!(distance(&a, &b, Metric::Manhattan, Some(&foreign)).is_err());
}

#[test]
fn test_steinhaus_zero_when_points_coincide() {
    let a = point(5, 1);
    for metric in Metric::ALL {
        assert_eq!(distance(&a, &a, metric, Some(&a)).unwrap(), 0.0);
        assert_eq!(distance(&a, &a, metric, Some(&point(2, 2))).unwrap(), 0.0);
    }
}

#[test]
fn test_metric_parse_and_display() {
    for metric in Metric::ALL {
        assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
    }
    assert_eq!("Ring".parse::<Metric>().unwrap(), Metric::Ring);
    assert!("hamming".parse::<Metric>().is_err());
}

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn test_orthant_number() {
    let center = point(0, 0);
    assert_eq!(orthant_number(&center, &point(1, 7)).unwrap(), 0b01);
    assert_eq!(orthant_number(&center, &point(3, 2)).unwrap(), 0b11);
    // half way round and equal coordinates both count as behind
    assert_eq!(orthant_number(&center, &point(4, 0)).unwrap(), 0);

    let wide = Identifier::zero(64, 1).unwrap();
    assert!(matches!(
        orthant_number(&wide, &wide),
        Err(IdentifierError::Overflow { .. })
    ));
}

#[test]
fn test_semiring_number() {
    let center = point(0, 0);
    // ring value 1 of 64: ahead
    assert_eq!(semiring_number(&center, &point(1, 0)).unwrap(), 1);
    // ring value 16 of 64: ahead
    assert_eq!(semiring_number(&center, &point(4, 0)).unwrap(), 1);
    // ring value 32 of 64: tie, behind
    assert_eq!(semiring_number(&center, &point(0, 4)).unwrap(), 0);
    // ring value 31 of 64: ahead
    assert_eq!(semiring_number(&center, &point(7, 3)).unwrap(), 1);
    // ring value 34 of 64: behind
    assert_eq!(semiring_number(&center, &point(0, 5)).unwrap(), 0);
}

#[test]
fn test_spherical_projection_distance() {
    let center = point4(0, 0);
    let a = point4(1, 0);
    let b = point4(0, 1);
    let opposite = point4(15, 0);

    let right = spherical_projection_distance(&a, &b, &center, 1.0).unwrap();
    assert!((right - FRAC_PI_2).abs() < 1e-12);

    let scaled = spherical_projection_distance(&a, &b, &center, 5.0).unwrap();
    assert!((scaled - FRAC_PI_2).abs() < 1e-12);

    let flat = spherical_projection_distance(&a, &opposite, &center, 1.0).unwrap();
    assert!((flat - PI).abs() < 1e-12);

    assert_eq!(
        spherical_projection_distance(&a, &a, &center, 1.0).unwrap(),
        0.0
    );
    assert!(spherical_projection_distance(&a, &point(0, 1), &center, 1.0).is_err());
    assert!(matches!(
        spherical_projection_distance(&a, &b, &center, 0.0),
        Err(IdentifierError::InvalidRadius(_))
    ));
}

// =============================================================================
// Codec and hashing
// =============================================================================

#[test]
fn test_byte_length() {
    assert_eq!(byte_length(4, 8), 4);
    assert_eq!(byte_length(3, 5), 3);
    assert_eq!(byte_length(1, 9), 2);
    assert_eq!(byte_length(5, 3), 3);
    assert_eq!(byte_length(9, 2), 4);
    assert_eq!(byte_length(0, 4), 0);
}

#[test]
fn test_packed_encoding_layout() {
    let id = Identifier::from_digits(4, 4, &[1, 2, 3, 4]).unwrap();
    assert_eq!(id.to_bytes(ByteOrder::BigEndian), vec![0x12, 0x34]);
    assert_eq!(id.to_bytes(ByteOrder::LittleEndian), vec![0x34, 0x12]);

    let odd = Identifier::from_digits(3, 3, &[5, 2, 7]).unwrap();
    assert_eq!(odd.to_bytes(ByteOrder::BigEndian), vec![0xA8, 0xE0]);
}

#[test]
fn test_general_encoding_layout() {
    let id = Identifier::from_digits(12, 1, &[0xABC]).unwrap();
    assert_eq!(id.to_bytes(ByteOrder::BigEndian), vec![0x0A, 0xBC]);
    assert_eq!(id.to_bytes(ByteOrder::LittleEndian), vec![0xBC, 0x0A]);
    assert_eq!(id.to_string(), "0abc");
}

#[test]
fn test_decode_rejects_bad_input() {
    assert_eq!(
        Identifier::from_bytes(&[0x00], 12, 1, ByteOrder::BigEndian),
        Err(IdentifierError::ByteLength {
            expected: 2,
            actual: 1
        })
    );
    assert_eq!(
        Identifier::from_bytes(&[0x1A, 0xBC], 12, 1, ByteOrder::BigEndian),
        Err(IdentifierError::NonCanonicalPadding)
    );
    assert_eq!(
        Identifier::from_bytes(&[0x01], 3, 1, ByteOrder::BigEndian),
        Err(IdentifierError::NonCanonicalPadding)
    );
    assert!(Identifier::from_bytes(&[], 0, 1, ByteOrder::BigEndian).is_err());
}

#[test]
fn test_hash_follows_identity() {
    let a = point(3, 5);
    let b = point(5, 3);
    assert_eq!(a.calculate_hash(), a.clone().calculate_hash());
    assert_ne!(a.calculate_hash(), b.calculate_hash());

    let wide_a = Identifier::from_digits(8, 2, &[1, 2]).unwrap();
    let wide_b = Identifier::from_digits(8, 2, &[2, 1]).unwrap();
    assert_ne!(wide_a.calculate_hash(), wide_b.calculate_hash());
}

#[test]
fn test_hash_is_seeded_by_shape() {
    // identical all-zero storage under two shapes
    let tall = Identifier::zero(2, 3).unwrap();
    let flat = Identifier::zero(3, 2).unwrap();
    assert_ne!(tall.calculate_hash(), flat.calculate_hash());
    assert_eq!(
        tall.calculate_hash(),
        Identifier::zero(2, 3).unwrap().calculate_hash()
    );
}

// =============================================================================
// Properties
// =============================================================================

fn arb_pair() -> impl Strategy<Value = (Identifier, Identifier)> {
    (1usize..=6, 1usize..=8, any::<u64>()).prop_map(|(dims, digits, seed)| {
        let mut rng = StdRng::seed_from_u64(seed);
        (
            Identifier::random(dims, digits, &mut rng).unwrap(),
            Identifier::random(dims, digits, &mut rng).unwrap(),
        )
    })
}

/// Digits read as one big-endian number (`dims * digits <= 64`).
fn ring_value(id: &Identifier) -> u64 {
    (0..id.digits_count()).fold(0u64, |acc, d| {
        (acc << id.dimensions()) | id.digit_as_int(d).unwrap()
    })
}

proptest! {
    #[test]
    fn prop_ring_matches_digit_sequence_value(
        dims in 2usize..=4,
        digits in 1usize..=8,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = Identifier::random(dims, digits, &mut rng).unwrap();
        let b = Identifier::random(dims, digits, &mut rng).unwrap();
        let bits = dims * digits;
        let (va, vb) = (ring_value(&a), ring_value(&b));

        let delta = va.abs_diff(vb);
        let expected = delta.min((1u64 << bits) - delta) as f64;
        prop_assert_eq!(distance(&a, &b, Metric::Ring, None).unwrap(), expected);

        // the same numbers on a one-dimensional identifier
        let mut line_a = Identifier::zero(1, bits).unwrap();
        let mut line_b = Identifier::zero(1, bits).unwrap();
        line_a.set_coordinate(0, va).unwrap();
        line_b.set_coordinate(0, vb).unwrap();
        prop_assert_eq!(distance(&line_a, &line_b, Metric::Manhattan, None).unwrap(), expected);
        prop_assert_eq!(distance(&line_a, &line_b, Metric::Ring, None).unwrap(), expected);

        let ahead = (vb.wrapping_sub(va) & ((1u64 << bits) - 1)) < (1u64 << (bits - 1));
        prop_assert_eq!(
            semiring_number(&a, &b).unwrap(),
            u64::from(ahead && va != vb)
        );
    }

    #[test]
    fn prop_bytes_round_trip(dims in 1usize..=12, digits in 1usize..=24, seed in any::<u64>()) {
        let id = Identifier::random(dims, digits, &mut StdRng::seed_from_u64(seed)).unwrap();
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            let bytes = id.to_bytes(order);
            prop_assert_eq!(bytes.len(), byte_length(dims, digits));
            prop_assert_eq!(Identifier::from_bytes(&bytes, dims, digits, order).unwrap(), id.clone());
        }
    }

    #[test]
    fn prop_views_agree_after_arithmetic(
        (a, b) in arb_pair(),
        op in 0u8..4,
        dim_seed in any::<usize>(),
        digit_seed in any::<usize>(),
    ) {
        let dim = dim_seed % a.dimensions();
        let digit = digit_seed % a.digits_count();
        let result = match op {
            0 => a.xor(&b).unwrap(),
            1 => a.and(&b).unwrap(),
            2 => a.add_in_dimension(dim, digit).unwrap(),
            _ => a.sub_in_dimension(dim, digit).unwrap(),
        };
        let digits = result.digits_count();
        for d in 0..digits {
            for c in 0..result.dimensions() {
                let by_digit = (result.digit_as_int(d).unwrap() >> c) & 1;
                let by_coordinate = (result.coordinate(c).unwrap() as u64 >> (digits - 1 - d)) & 1;
                prop_assert_eq!(by_digit, by_coordinate);
                prop_assert_eq!(by_digit == 1, result.digit_bit(d, c).unwrap());
            }
        }
    }

    #[test]
    fn prop_add_then_sub_is_identity((a, _b) in arb_pair(), dim_seed in any::<usize>(), digit_seed in any::<usize>()) {
        let dim = dim_seed % a.dimensions();
        let digit = digit_seed % a.digits_count();
        let back = a.add_in_dimension(dim, digit).unwrap().sub_in_dimension(dim, digit).unwrap();
        prop_assert_eq!(back, a);
    }

    #[test]
    fn prop_metrics_symmetric_and_non_negative((a, b) in arb_pair()) {
        for metric in Metric::ALL {
            let ab = distance(&a, &b, metric, None).unwrap();
            let ba = distance(&b, &a, metric, None).unwrap();
            prop_assert!(ab >= 0.0);
            prop_assert_eq!(ab, ba);
        }
    }

    #[test]
    fn prop_steinhaus_zero_on_identity((a, b) in arb_pair()) {
        for metric in Metric::ALL {
            prop_assert_eq!(distance(&a, &a, metric, Some(&b)).unwrap(), 0.0);
            prop_assert_eq!(distance(&a, &a, metric, Some(&a)).unwrap(), 0.0);
        }
    }

    #[test]
    fn prop_full_prefix_iff_equal((a, _b) in arb_pair(), flip_seed in any::<usize>()) {
        prop_assert_eq!(a.common_prefix_length(&a.clone()).unwrap(), a.digits_count());

        let flip = flip_seed % a.num_bits();
        let mut other = a.clone();
        other.set_bit(flip, !a.get(flip).unwrap()).unwrap();
        let prefix = a.common_prefix_length(&other).unwrap();
        prop_assert_eq!(prefix, flip / a.dimensions());
        prop_assert!(prefix < a.digits_count());
    }
}
