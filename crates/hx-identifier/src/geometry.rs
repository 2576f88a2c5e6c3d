//! Adjacency and projection predicates around a reference point.

use std::cmp::Ordering;

use bitvec::prelude::*;

use crate::error::IdentifierError;
use crate::identifier::{bits_to_f64, Identifier};
use crate::ops::{compare_bits, torus_deltas};

/// Widest identifier an orthant number can describe.
pub const MAX_ORTHANT_DIMENSIONS: usize = 63;

/// Orthant of `point` as seen from `center`.
///
/// Bit `c` is set when `point` lies strictly ahead of `center` on axis `c`,
/// i.e. the forward torus displacement is shorter than the backward one.
/// Ties (same coordinate or exactly half way round) count as behind.
pub fn orthant_number(center: &Identifier, point: &Identifier) -> Result<u64, IdentifierError> {
    center.ensure_same_shape(point)?;
    if center.dimensions() > MAX_ORTHANT_DIMENSIONS {
        return Err(IdentifierError::Overflow {
            dimensions: center.dimensions(),
            width: MAX_ORTHANT_DIMENSIONS as u32,
        });
    }
    Ok((0..center.dimensions())
        .filter(|&c| is_ahead(&center.coordinate_bits(c), &point.coordinate_bits(c)))
        .fold(0u64, |orthant, c| orthant | (1 << c)))
}

/// One-dimensional analogue of [`orthant_number`] over the whole identifier.
pub fn semiring_number(center: &Identifier, point: &Identifier) -> Result<u64, IdentifierError> {
    center.ensure_same_shape(point)?;
    Ok(u64::from(is_ahead(&center.ring_bits(), &point.ring_bits())))
}

/// Angular distance between `a` and `b` projected onto a sphere around `center`.
///
/// Each point's per-axis torus displacement from `center` is scaled onto
/// the sphere of the given radius; the chord between the two projections
/// is turned into the central angle `2·asin(chord / 2r)`, in radians.
/// A point that coincides with `center` has no direction and yields `0`.
pub fn spherical_projection_distance(
    a: &Identifier,
    b: &Identifier,
    center: &Identifier,
    radius: f64,
) -> Result<f64, IdentifierError> {
    a.ensure_same_shape(b)?;
    a.ensure_same_shape(center)?;
    if !(radius.is_finite() && radius > 0.0) {
        return Err(IdentifierError::InvalidRadius(radius));
    }

    let va = displacement(center, a);
    let vb = displacement(center, b);
    let norm_a = norm(&va);
    let norm_b = norm(&vb);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let chord = va
        .iter()
        .zip(&vb)
        .map(|(x, y)| {
            let delta = x * radius / norm_a - y * radius / norm_b;
            delta * delta
        })
        .sum::<f64>()
        .sqrt();
    Ok(2.0 * (chord / (2.0 * radius)).min(1.0).asin())
}

fn is_ahead(center: &BitSlice<u64, Msb0>, point: &BitSlice<u64, Msb0>) -> bool {
    let (forward, backward) = torus_deltas(center, point);
    compare_bits(&forward, &backward) == Ordering::Less
}

/// Signed shortest per-axis displacement from `center` to `point`.
fn displacement(center: &Identifier, point: &Identifier) -> Vec<f64> {
    (0..center.dimensions())
        .map(|c| {
            let (forward, backward) =
                torus_deltas(&center.coordinate_bits(c), &point.coordinate_bits(c));
            match compare_bits(&forward, &backward) {
                Ordering::Greater => -bits_to_f64(&backward),
                _ => bits_to_f64(&forward),
            }
        })
        .collect()
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
