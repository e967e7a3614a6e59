//! Placement of participants into round-1 bracket slots.
//!
//! Two placement policies exist: a uniform shuffle for [`SeedingMode::Random`]
//! and the standard fold for [`SeedingMode::Standard`].
//!
//! [`SeedingMode::Random`]: crate::SeedingMode::Random
//! [`SeedingMode::Standard`]: crate::SeedingMode::Standard

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Participant, ParticipantId};

/// Returns the fold-seeded sequence of seed ranks for a bracket with
/// `total_slots` slots.
///
/// The sequence is built recursively starting from `[1, 2]`: at each doubling
/// step every seed `s` in a sequence of length `L` is followed by its
/// complement `2L + 1 - s`. Consecutive pairs of the result are the round-1
/// pairings, so seed 1 plays the lowest seed, seed 2 the second lowest, and
/// so on.
///
/// # Panics
///
/// Panics if `total_slots` is not a power of two or is smaller than 2.
pub fn fold_seeds(total_slots: usize) -> Vec<usize> {
    assert!(
        total_slots.is_power_of_two() && total_slots >= 2,
        "bracket slots must be a power of two >= 2, got {}",
        total_slots
    );

    let mut seeds = vec![1, 2];

    while seeds.len() < total_slots {
        let next_size = seeds.len() * 2;
        let mut next = Vec::with_capacity(next_size);

        for &seed in &seeds {
            next.push(seed);
            next.push(next_size + 1 - seed);
        }

        seeds = next;
    }

    seeds
}

/// Places `participants` into fold-seeded bracket slots.
///
/// The returned list always has a power-of-two length. A seed rank beyond the
/// participant count maps to `None`, a permanently empty slot which round-1
/// pairing turns into a bye.
pub(crate) fn seeded_slots(participants: &[Participant]) -> Vec<Option<ParticipantId>> {
    let total_slots = participants.len().next_power_of_two();

    fold_seeds(total_slots)
        .into_iter()
        .map(|rank| participants.get(rank - 1).map(|p| p.id))
        .collect()
}

/// Returns the participant ids in uniformly shuffled order.
pub(crate) fn shuffled<R>(participants: &[Participant], rng: &mut R) -> Vec<ParticipantId>
where
    R: Rng + ?Sized,
{
    let mut ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
    ids.shuffle(rng);
    ids
}
