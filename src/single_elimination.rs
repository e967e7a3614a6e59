use rand::Rng;

use crate::{seeding, Match, MatchId, MatchStatus, Participant, ParticipantId, SeedingMode};

/// A complete single elimination draw.
///
/// Building a draw creates every match of the bracket at once: round 1 holds
/// `size / 2` matches where `size` is the smallest power of two covering the
/// participants, each following round halves the match count down to a single
/// final. Every non-final match is linked forward to the match its winner
/// feeds into, and round-1 byes are resolved at construction time, so the
/// returned matches never require a second pass.
#[derive(Clone, Debug)]
pub struct SingleElimination {
    matches: Vec<Match>,
}

impl SingleElimination {
    /// Creates a new `SingleElimination` draw for the given `participants`.
    ///
    /// Fewer than 2 participants is not a draw; the returned value then
    /// contains no matches at all and the caller must reject the operation.
    ///
    /// [`SeedingMode::Random`] shuffles with [`rand::thread_rng`]. Use
    /// [`new_with_rng`] to control the randomness.
    ///
    /// [`new_with_rng`]: Self::new_with_rng
    pub fn new(participants: &[Participant], seeding: SeedingMode) -> Self {
        Self::new_with_rng(participants, seeding, &mut rand::thread_rng())
    }

    /// Creates a new `SingleElimination` draw using `rng` as the source of
    /// randomness for [`SeedingMode::Random`].
    ///
    /// [`SeedingMode::Standard`] never consumes randomness; given the same
    /// input order it always produces the same pairings.
    pub fn new_with_rng<R>(participants: &[Participant], seeding: SeedingMode, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        log::debug!(
            "Creating new SingleElimination draw with {} participants ({:?} seeding)",
            participants.len(),
            seeding
        );

        if participants.len() < 2 {
            return Self {
                matches: Vec::new(),
            };
        }

        let matches = match seeding {
            SeedingMode::Standard => {
                // The fold slot list is already a power of two long, with
                // explicit empty slots for seed ranks beyond the entry list.
                let slots = seeding::seeded_slots(participants);
                let size = slots.len();

                let mut matches = Self::build_tree(size);
                Self::populate_seeded(&mut matches, &slots);
                matches
            }
            SeedingMode::Random => {
                let players = seeding::shuffled(participants, rng);
                let size = players.len().next_power_of_two();

                let mut matches = Self::build_tree(size);
                Self::populate_shuffled(&mut matches, players, size);
                matches
            }
        };

        log::debug!(
            "Created new SingleElimination draw with {} matches",
            matches.len()
        );

        Self { matches }
    }

    /// Creates the empty match tree for a bracket with `size` slots and links
    /// every non-final match to its follow-up match.
    ///
    /// Matches `2k - 1` and `2k` of a round both feed match `k` of the next
    /// round.
    fn build_tree(size: usize) -> Vec<Match> {
        let total_rounds = size.ilog2();

        let mut matches = Vec::with_capacity(size - 1);
        let mut round_offsets = Vec::with_capacity(total_rounds as usize);

        let mut count = size / 2;
        for round in 1..=total_rounds {
            round_offsets.push(matches.len());

            for number in 1..=count {
                matches.push(Match::new(round, number as u32));
            }

            count /= 2;
        }

        for index in 0..matches.len() {
            let round = matches[index].round_number;
            if round == total_rounds {
                break;
            }

            let number = matches[index].match_number_in_round;
            let next_index = round_offsets[round as usize] + (number as usize - 1) / 2;

            let next_id = matches[next_index].id;
            matches[index].next_match_id = Some(next_id);
        }

        matches
    }

    /// Fills round 1 from the fold slot list, resolving byes as they appear.
    fn populate_seeded(matches: &mut [Match], slots: &[Option<ParticipantId>]) {
        for index in 0..slots.len() / 2 {
            let player1 = slots[index * 2];
            let player2 = slots[index * 2 + 1];

            let r#match = &mut matches[index];
            r#match.player1_id = player1;
            r#match.player2_id = player2;

            let winner = match (player1, player2) {
                (Some(winner), None) | (None, Some(winner)) => winner,
                (None, None) => {
                    // Both seed ranks map beyond the entry list. Unreachable
                    // while the bracket size is the smallest covering power of
                    // two, but the contract keeps the state representable.
                    r#match.status = MatchStatus::Bye;
                    continue;
                }
                (Some(_), Some(_)) => continue,
            };

            let id = r#match.id;
            complete_walkover(r#match, winner);
            advance_winner(matches, id, winner);
        }
    }

    /// Fills round 1 from the shuffled player list.
    ///
    /// The `size - players` byes are packed into the earliest round-1 matches,
    /// one single-sided match each, and every bye is resolved immediately.
    /// Remaining matches take two players each.
    fn populate_shuffled(matches: &mut [Match], players: Vec<ParticipantId>, size: usize) {
        let byes = size - players.len();
        let mut players = players.into_iter();

        for index in 0..size / 2 {
            if index < byes {
                let player1 = players.next();

                let r#match = &mut matches[index];
                r#match.player1_id = player1;

                if let Some(winner) = player1 {
                    let id = r#match.id;
                    complete_walkover(r#match, winner);
                    advance_winner(matches, id, winner);
                }
            } else {
                let r#match = &mut matches[index];
                r#match.player1_id = players.next();
                r#match.player2_id = players.next();
            }
        }
    }

    /// Returns a reference to the matches of the draw.
    #[inline]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Returns the matches from the draw, in bracket order: round 1 first,
    /// ascending match numbers within each round.
    #[inline]
    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }

    /// Returns the matches from the draw ordered for bulk insertion into a
    /// store which checks `next_match_id` references eagerly: deepest rounds
    /// first, so every forward reference points at an already inserted match.
    ///
    /// The order within a round is preserved.
    pub fn into_insert_order(self) -> Vec<Match> {
        let mut matches = self.matches;
        matches.sort_by(|a, b| b.round_number.cmp(&a.round_number));
        matches
    }
}

/// Moves the winner of a decided match into the correct slot of the match its
/// `next_match_id` points at.
///
/// The slot is chosen by the parity of the decided match's position in its
/// round: the odd-numbered feeder fills `player1_id`, the even-numbered feeder
/// fills `player2_id`. Does nothing if `decided` is not in `matches`, has no
/// follow-up match (the final), or the follow-up match is missing.
///
/// This is the same rule the builder applies for byes; result reporting must
/// go through it as well so both paths stay in agreement.
pub fn advance_winner(matches: &mut [Match], decided: MatchId, winner: ParticipantId) {
    let (next_id, feeds_first_slot) = match matches.iter().find(|m| m.id == decided) {
        Some(r#match) => match r#match.next_match_id {
            Some(next_id) => (next_id, r#match.feeds_first_slot()),
            None => return,
        },
        None => return,
    };

    if let Some(next) = matches.iter_mut().find(|m| m.id == next_id) {
        log::debug!(
            "Advancing winner {} of match {} into match {}",
            winner,
            decided,
            next_id
        );

        if feeds_first_slot {
            next.player1_id = Some(winner);
        } else {
            next.player2_id = Some(winner);
        }
    }
}

/// Records an immediate walkover win.
fn complete_walkover(r#match: &mut Match, winner: ParticipantId) {
    r#match.status = MatchStatus::Completed;
    r#match.winner_id = Some(winner);
    r#match.score = Some(Match::BYE_SCORE.to_owned());
}
