use crate::domain::SlotMut;

use super::{worst_by, Admission, Candidate, SlotSelector};

/// Keeps the closest peers: once full, the most distant member is replaced
/// by any strictly closer candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceSelector;

impl SlotSelector for DistanceSelector {
    fn name(&self) -> &'static str {
        "distance"
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

        match worst_by(slot.members(), |m| m.distance()) {
            Some((index, worst)) if candidate.distance < worst => slot
                .replace(index, entry)
                .map_or(Admission::Declined, |evicted| Admission::Replaced {
                    evicted: evicted.hash(),
                }),
            _ => Admission::Declined,
        }
    }
}
