use hx_identifier::{IdentifierError, Metric};
use tracing::debug;

use crate::domain::{EvennessConfig, RoutingTableEntry, SlotMut};

use super::{Admission, Candidate, SlotSelector};

/// Minimizes `w1 · meanPairwise^k1 + w2 · meanToSelf^k2` over the slot.
///
/// Once full, every single-member swap with the candidate is scored and the
/// best one is applied if it strictly lowers the objective.
#[derive(Debug, Clone)]
pub struct EvennessSelector {
    metric: Metric,
    weights: EvennessConfig,
}

impl EvennessSelector {
    /// Selector measuring member spread with `metric`.
    pub fn new(metric: Metric, weights: EvennessConfig) -> Self {
        Self { metric, weights }
    }

    /// Objective value for a set of `n` members.
    pub fn objective(&self, pair_sum: f64, self_sum: f64, n: usize) -> f64 {
        let pairs = n * n.saturating_sub(1) / 2;
        let mean_pair = if pairs == 0 { 0.0 } else { pair_sum / pairs as f64 };
        let mean_self = if n == 0 { 0.0 } else { self_sum / n as f64 };
        self.weights.w1 * mean_pair.powf(self.weights.k1)
            + self.weights.w2 * mean_self.powf(self.weights.k2)
    }

    /// Index of the best member to swap out and the objective after the swap.
    fn best_swap(
        &self,
        candidate: &Candidate<'_>,
        members: &[RoutingTableEntry],
    ) -> Result<Option<(usize, f64, f64)>, IdentifierError> {
        let n = members.len();
        let mut pairwise = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.metric.measure(members[i].id(), members[j].id())?;
                pairwise[i][j] = d;
                pairwise[j][i] = d;
            }
        }
        let to_candidate = members
            .iter()
            .map(|m| self.metric.measure(m.id(), candidate.node.id()))
            .collect::<Result<Vec<_>, _>>()?;

        let pair_sum: f64 = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| pairwise[i][j])
            .sum();
        let self_sum: f64 = members.iter().map(|m| m.distance()).sum();
        let current = self.objective(pair_sum, self_sum, n);

        let best = (0..n)
            .map(|i| {
                let lost: f64 = pairwise[i].iter().sum();
                let gained: f64 = (0..n).filter(|&j| j != i).map(|j| to_candidate[j]).sum();
                let swapped = self.objective(
                    pair_sum - lost + gained,
                    self_sum - members[i].distance() + candidate.distance,
                    n,
                );
                (i, swapped)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        Ok(best.map(|(i, swapped)| (i, swapped, current)))
    }
}

impl SlotSelector for EvennessSelector {
    fn name(&self) -> &'static str {
        "avg-dist-evenness"
    }

    fn admit(&self, candidate: &Candidate<'_>, slot: &mut SlotMut<'_>) -> Admission {
        let entry = candidate.to_entry(slot.slot_ref());
        if !slot.is_full() {
            return if slot.push(entry) {
                Admission::Admitted
            } else {
                Admission::Declined
            };
        }

        match self.best_swap(candidate, slot.members()) {
            Ok(Some((index, swapped, current))) if swapped < current => slot
                .replace(index, entry)
                .map_or(Admission::Declined, |evicted| Admission::Replaced {
                    evicted: evicted.hash(),
                }),
            Ok(_) => Admission::Declined,
            Err(error) => {
                debug!(%error, "evenness objective not computable");
                Admission::Declined
            }
        }
    }
}
