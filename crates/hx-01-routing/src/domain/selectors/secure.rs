use hx_identifier::{Identifier, IdentifierError, Metric};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::domain::{SecureConfig, SlotMut};

use super::{Admission, Candidate, SlotSelector};

/// Ranks members by distance measured after XOR-ing both the local and the
/// peer identifier with a secret random mask.
///
/// The mask is restricted to the digits that vary inside the slot (digits
/// `digits_count - level ..`), so the ranking stays a ranking of the slot's
/// own hypercube, and it is redrawn every `mask_refresh_interval`
/// admissions. Eviction order cannot be predicted from raw identifiers.
#[derive(Debug)]
pub struct SecureSelector {
    metric: Metric,
    refresh_interval: u64,
    state: Mutex<MaskState>,
}

#[derive(Debug)]
struct MaskState {
    rng: StdRng,
    mask: Option<Identifier>,
    admissions: u64,
}

impl SecureSelector {
    /// Selector seeded from `config.seed`, or from OS entropy when unset.
    pub fn new(metric: Metric, config: &SecureConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(metric, config.mask_refresh_interval, rng)
    }

    /// Selector drawing masks from `rng`.
    pub fn with_rng(metric: Metric, refresh_interval: u64, rng: StdRng) -> Self {
        Self {
            metric,
            refresh_interval: refresh_interval.max(1),
            state: Mutex::new(MaskState {
                rng,
                mask: None,
                admissions: 0,
            }),
        }
    }

    /// Admissions counted so far.
    pub fn admissions(&self) -> u64 {
        self.state.lock().admissions
    }
}

impl MaskState {
    fn mask_for(&mut self, local: &Identifier) -> Result<&Identifier, IdentifierError> {
        let mask = match self.mask.take() {
            Some(mask) if mask.shape() == local.shape() => mask,
            _ => Identifier::random(local.dimensions(), local.digits_count(), &mut self.rng)?,
        };
        Ok(&*self.mask.insert(mask))
    }

    fn record_admission(&mut self, interval: u64) {
        self.admissions += 1;
        if self.admissions % interval == 0 {
            trace!(admissions = self.admissions, "secure mask refreshed");
            self.mask = None;
        }
    }
}

/// `mask` with every digit before `start` cleared.
fn window(mask: &Identifier, start: usize) -> Result<Identifier, IdentifierError> {
    let mut windowed = mask.clone();
    for d in 0..start.min(mask.digits_count()) {
        windowed.set_digit(d, 0)?;
    }
    Ok(windowed)
}

impl SecureSelector {
    fn obfuscated_ranking(
        &self,
        state: &mut MaskState,
        candidate: &Candidate<'_>,
        slot: &SlotMut<'_>,
    ) -> Result<(f64, Option<(usize, f64)>), IdentifierError> {
        let local = candidate.local;
        let start = local.digits_count().saturating_sub(slot.slot_ref().level);
        let mask = window(state.mask_for(local)?, start)?;
        let hidden_local = local.xor(&mask)?;
        let measure = |id: &Identifier| -> Result<f64, IdentifierError> {
            self.metric.measure(&hidden_local, &id.xor(&mask)?)
        };

        let own = measure(candidate.node.id())?;
        let scores = slot
            .members()
            .iter()
            .map(|m| measure(m.id()))
            .collect::<Result<Vec<_>, _>>()?;
        let worst = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &score)| (i, score));
        Ok((own, worst))
    }
}

impl SlotSelector for SecureSelector {
    fn name(&self) -> &'static str {
        "secure"
    }

    fn admit(&self, candidate: &Candidate<'_>, slot: &mut SlotMut<'_>) -> Admission {
        let mut state = self.state.lock();
        let entry = candidate.to_entry(slot.slot_ref());

        if !slot.is_full() {
            if !slot.push(entry) {
                return Admission::Declined;
            }
            state.record_admission(self.refresh_interval);
            return Admission::Admitted;
        }

        let (own, worst) = match self.obfuscated_ranking(&mut state, candidate, slot) {
            Ok(ranking) => ranking,
            Err(error) => {
                debug!(%error, "secure ranking failed");
                return Admission::Declined;
            }
        };
        match worst {
            Some((index, worst)) if own < worst => match slot.replace(index, entry) {
                Some(evicted) => {
                    state.record_admission(self.refresh_interval);
                    Admission::Replaced {
                        evicted: evicted.hash(),
                    }
                }
                None => Admission::Declined,
            },
            _ => Admission::Declined,
        }
    }
}
