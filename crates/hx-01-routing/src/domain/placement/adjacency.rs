//! Where a peer falls relative to the local node: RT1 coordinates and the
//! RT2 sibling-hypercube scan.

use hx_identifier::{Identifier, IdentifierError};

/// Relative position of a candidate, computed once per notify.
#[derive(Debug, Clone)]
pub struct Adjacency {
    /// Leading digits shared with the local node.
    pub common_prefix: usize,
    /// RT1 level: `digits_count - 1 - common_prefix`.
    pub rt1_level: usize,
    /// RT1 column: the candidate's digit at `common_prefix`.
    pub rt1_column: u64,
    /// The first differing digit differs in exactly one bit.
    pub sibling: bool,
    /// Candidate RT2 levels, if the difference is confined to one dimension.
    pub rt2: Option<Rt2Scan>,
}

/// Levels over which the candidate may sit in a sibling hypercube of the
/// local node along `dimension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rt2Scan {
    /// The single differing dimension.
    pub dimension: usize,
    /// Lowest level worth checking.
    pub min_level: usize,
    /// Highest level worth checking.
    pub max_level: usize,
}

impl Adjacency {
    /// Position of `candidate` relative to `local`.
    ///
    /// Fails for identifiers of different shapes, for identical identifiers
    /// and when digits do not fit a `u64`.
    pub fn compute(local: &Identifier, candidate: &Identifier) -> Result<Self, IdentifierError> {
        let xor = local.xor(candidate)?;
        let digits = local.digits_count();
        let common_prefix = local.common_prefix_length(candidate)?;
        if common_prefix >= digits {
            return Err(IdentifierError::IndexOutOfRange {
                what: "differing digit",
                index: common_prefix,
                limit: digits,
            });
        }

        let sibling = xor.digit_ones(common_prefix)? == 1;
        let rt2 = if sibling {
            let dimension = xor.digit_as_int(common_prefix)?.trailing_zeros() as usize;
            let run_end = run_end(&xor, common_prefix, dimension)?;
            Some(Rt2Scan {
                dimension,
                min_level: digits - run_end,
                max_level: digits - 1 - common_prefix,
            })
        } else {
            None
        };

        Ok(Self {
            common_prefix,
            rt1_level: digits - 1 - common_prefix,
            rt1_column: candidate.digit_as_int(common_prefix)?,
            sibling,
            rt2,
        })
    }
}

/// First digit at or after `start` whose xor is neither zero nor the single
/// `dimension` bit.
fn run_end(xor: &Identifier, start: usize, dimension: usize) -> Result<usize, IdentifierError> {
    let flag = 1u64 << dimension;
    for d in start..xor.digits_count() {
        let digit = xor.digit_as_int(d)?;
        if digit != 0 && digit != flag {
            return Ok(d);
        }
    }
    Ok(xor.digits_count())
}

impl Rt2Scan {
    /// Lowest level in `min_level..=min(max_level, below - 1)` at which
    /// `candidate` lies in the hypercube one step up or down `dimension`
    /// from `local`.
    pub fn matching_level(
        &self,
        local: &Identifier,
        candidate: &Identifier,
        below: usize,
    ) -> Result<Option<usize>, IdentifierError> {
        let digits = local.digits_count();
        let top = self.max_level.min(below.saturating_sub(1));
        if below == 0 || top < self.min_level {
            return Ok(None);
        }
        for level in self.min_level..=top {
            let prefix = digits - level;
            let up = local.add_in_dimension(self.dimension, prefix - 1)?;
            let down = local.sub_in_dimension(self.dimension, prefix - 1)?;
            if candidate.common_prefix_length(&up)? >= prefix
                || candidate.common_prefix_length(&down)? >= prefix
            {
                return Ok(Some(level));
            }
        }
        Ok(None)
    }
}
