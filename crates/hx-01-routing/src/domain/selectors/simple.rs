use crate::domain::SlotMut;

use super::{Admission, Candidate, SlotSelector};

/// First come, first served: admit while there is room, never evict.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSelector;

impl SlotSelector for SimpleSelector {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn admit(&self, candidate: &Candidate<'_>, slot: &mut SlotMut<'_>) -> Admission {
        if slot.push(candidate.to_entry(slot.slot_ref())) {
            Admission::Admitted
        } else {
            Admission::Declined
        }
    }
}
