//! Torus distance metrics and the Steinhaus transform.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;

use crate::error::IdentifierError;
use crate::identifier::{bits_to_f64, Identifier};
use crate::ops::{compare_bits, torus_deltas};

/// Distance metric over the identifier torus.
///
/// Every metric is built from the per-axis wrap-around distance
/// `min(|Δ|, range − |Δ|)` where `range = 2^digits_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    /// Sum of per-axis distances.
    #[default]
    Manhattan,
    /// Square root of the sum of squared per-axis distances.
    Euclidean,
    /// Largest per-axis distance.
    Chebyshev,
    /// The whole identifier read as a single torus coordinate.
    Ring,
}

impl Metric {
    /// All metrics, in declaration order.
    pub const ALL: [Metric; 4] = [
        Metric::Manhattan,
        Metric::Euclidean,
        Metric::Chebyshev,
        Metric::Ring,
    ];

    /// Raw distance between two identifiers of the same shape.
    pub fn measure(self, a: &Identifier, b: &Identifier) -> Result<f64, IdentifierError> {
        a.ensure_same_shape(b)?;
        let axes = (0..a.dimensions())
            .map(|c| axis_distance(&a.coordinate_bits(c), &b.coordinate_bits(c)));
        Ok(match self {
            Metric::Manhattan => axes.sum(),
            Metric::Euclidean => axes.map(|d| d * d).sum::<f64>().sqrt(),
            Metric::Chebyshev => axes.fold(0.0, f64::max),
            Metric::Ring => axis_distance(&a.ring_bits(), &b.ring_bits()),
        })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Manhattan => "manhattan",
            Metric::Euclidean => "euclidean",
            Metric::Chebyshev => "chebyshev",
            Metric::Ring => "ring",
        };
        f.write_str(name)
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Metric::Manhattan),
            "euclidean" => Ok(Metric::Euclidean),
            "chebyshev" => Ok(Metric::Chebyshev),
            "ring" => Ok(Metric::Ring),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// Distance between `a` and `b`, optionally anchored at a Steinhaus point.
///
/// With an anchor `A` the raw distance is transformed into
/// `2·d(a,b) / (d(a,A) + d(b,A) + d(a,b))`. The result is exactly `0` when
/// `d(a,b) = 0`. An anchor with more digits than the operands is truncated
/// to their digit count.
pub fn distance(
    a: &Identifier,
    b: &Identifier,
    metric: Metric,
    steinhaus_point: Option<&Identifier>,
) -> Result<f64, IdentifierError> {
    let d_ab = metric.measure(a, b)?;
    let Some(anchor) = steinhaus_point else {
        return Ok(d_ab);
    };

    let anchor = if anchor.digits_count() > a.digits_count()
        && anchor.dimensions() == a.dimensions()
    {
        anchor.truncated(a.digits_count())?
    } else {
        anchor.clone()
    };
    a.ensure_same_shape(&anchor)?;

    if d_ab == 0.0 {
        return Ok(0.0);
    }
    let d_a = metric.measure(a, &anchor)?;
    let d_b = metric.measure(b, &anchor)?;
    Ok(2.0 * d_ab / (d_a + d_b + d_ab))
}

/// Wrap-around distance between two MSB-first coordinates.
pub(crate) fn axis_distance(a: &BitSlice<u64, Msb0>, b: &BitSlice<u64, Msb0>) -> f64 {
    let (forward, backward) = torus_deltas(a, b);
    let shortest = match compare_bits(&forward, &backward) {
        Ordering::Greater => backward,
        _ => forward,
    };
    bits_to_f64(&shortest)
}
