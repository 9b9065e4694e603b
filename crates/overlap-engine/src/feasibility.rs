//! Group-wide feasibility of a single candidate interval.

use crate::range::TimeRange;

/// True when at least one of `slots` fully contains `candidate`.
///
/// Partial overlap does not count.
pub fn participant_is_free(candidate: &TimeRange, slots: &[TimeRange]) -> bool {
    slots.iter().any(|slot| slot.contains(candidate))
}

/// True when every participant has a slot that fully contains `candidate`.
///
/// Stops at the first participant who is not free. The answer does not depend
/// on the order participants are visited in. A group with no participants is
/// vacuously feasible; the batch layer never passes one.
pub fn is_feasible<'a, I>(candidate: &TimeRange, participants: I) -> bool
where
    I: IntoIterator<Item = &'a [TimeRange]>,
{
    participants
        .into_iter()
        .all(|slots| participant_is_free(candidate, slots))
}
