//! In-memory draw registry.
//!
//! [`DrawStore`] is the interface boundary between the draw builder and the
//! services consuming it: draw generation stores the full match set of a
//! tournament atomically, result reporting completes one match and moves the
//! winner into the linked follow-up match.
//!
//! All operations on one store go through a single [`Mutex`], which rules out
//! the two races a persistent backend has to handle itself: two concurrent
//! generations for the same tournament, and two sibling results racing for the
//! two slots of the same follow-up match.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::single_elimination::advance_winner;
use crate::{
    Error, Match, MatchId, MatchStatus, Participant, ParticipantId, Result, SeedingMode,
    SingleElimination, TournamentId,
};

/// An in-memory registry of draws, keyed by tournament.
///
/// A tournament holds at most one draw. [`generate`] refuses to overwrite an
/// existing draw; [`regenerate`] replaces it destructively, dropping all
/// recorded results.
///
/// [`generate`]: Self::generate
/// [`regenerate`]: Self::regenerate
#[derive(Debug, Default)]
pub struct DrawStore {
    draws: Mutex<HashMap<TournamentId, Vec<Match>>>,
}

impl DrawStore {
    /// Creates a new empty `DrawStore`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a new draw for `tournament` and stores it.
    ///
    /// Returns the stored matches in bracket order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BracketAlreadyExists`] if the tournament already has a
    /// draw and [`Error::InsufficientParticipants`] if fewer than 2
    /// participants are given.
    pub fn generate(
        &self,
        tournament: TournamentId,
        participants: &[Participant],
        seeding: SeedingMode,
    ) -> Result<Vec<Match>> {
        let mut draws = self.draws.lock();

        if draws.contains_key(&tournament) {
            return Err(Error::BracketAlreadyExists { tournament });
        }

        let matches = build_draw(participants, seeding)?;
        draws.insert(tournament, matches.clone());

        log::debug!(
            "Stored draw with {} matches for tournament {}",
            matches.len(),
            tournament
        );

        Ok(matches)
    }

    /// Builds a new draw for `tournament`, replacing any existing draw.
    ///
    /// Regeneration is destructive: every match of the previous draw is
    /// dropped, recorded results included. If building the new draw fails the
    /// previous draw is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientParticipants`] if fewer than 2
    /// participants are given.
    pub fn regenerate(
        &self,
        tournament: TournamentId,
        participants: &[Participant],
        seeding: SeedingMode,
    ) -> Result<Vec<Match>> {
        let mut draws = self.draws.lock();

        let matches = build_draw(participants, seeding)?;
        if draws.insert(tournament, matches.clone()).is_some() {
            log::debug!("Replaced existing draw for tournament {}", tournament);
        }

        Ok(matches)
    }

    /// Removes the draw of `tournament`, returning its matches.
    pub fn remove(&self, tournament: TournamentId) -> Option<Vec<Match>> {
        self.draws.lock().remove(&tournament)
    }

    /// Returns a snapshot of the matches of `tournament`, in bracket order.
    pub fn matches(&self, tournament: TournamentId) -> Option<Vec<Match>> {
        self.draws.lock().get(&tournament).cloned()
    }

    /// Records the result of a match and advances the winner into the linked
    /// follow-up match.
    ///
    /// Returns the completed match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DrawNotFound`] or [`Error::MatchNotFound`] if the
    /// target does not exist, [`Error::InvalidWinner`] if `winner` is not one
    /// of the two players of the match and [`Error::ResultAlreadyRecorded`] if
    /// the match is already completed.
    pub fn report_result(
        &self,
        tournament: TournamentId,
        match_id: MatchId,
        winner: ParticipantId,
        score: Option<String>,
    ) -> Result<Match> {
        let mut draws = self.draws.lock();

        let matches = draws
            .get_mut(&tournament)
            .ok_or(Error::DrawNotFound { tournament })?;

        let index = matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or(Error::MatchNotFound { match_id })?;

        if !matches[index].has_player(winner) {
            return Err(Error::InvalidWinner { match_id, winner });
        }

        if matches[index].status == MatchStatus::Completed {
            return Err(Error::ResultAlreadyRecorded { match_id });
        }

        let r#match = &mut matches[index];
        r#match.winner_id = Some(winner);
        r#match.score = score;
        r#match.status = MatchStatus::Completed;

        advance_winner(matches, match_id, winner);

        Ok(matches[index].clone())
    }
}

fn build_draw(participants: &[Participant], seeding: SeedingMode) -> Result<Vec<Match>> {
    let draw = SingleElimination::new(participants, seeding);

    // The builder signals a too small field by producing no matches.
    if draw.matches().is_empty() {
        return Err(Error::InsufficientParticipants {
            found: participants.len(),
        });
    }

    Ok(draw.into_matches())
}

#[cfg(test)]
mod tests {
    use super::DrawStore;
    use crate::{
        Error, Match, MatchId, MatchStatus, Participant, ParticipantId, SeedingMode, TournamentId,
    };

    fn participants(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|_| Participant::new(ParticipantId::new()))
            .collect()
    }

    fn at(matches: &[Match], round: u32, number: u32) -> Match {
        matches
            .iter()
            .find(|m| m.round_number == round && m.match_number_in_round == number)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_store_generate() {
        let store = DrawStore::new();
        let tournament = TournamentId::new();
        let entrants = participants(4);

        assert_eq!(store.matches(tournament), None);

        let matches = store
            .generate(tournament, &entrants, SeedingMode::Standard)
            .unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(store.matches(tournament).unwrap(), matches);

        // A second generation for the same tournament must be refused.
        assert_eq!(
            store
                .generate(tournament, &entrants, SeedingMode::Standard)
                .unwrap_err(),
            Error::BracketAlreadyExists { tournament }
        );

        // Other tournaments are unaffected.
        let other = TournamentId::new();
        store
            .generate(other, &entrants, SeedingMode::Random)
            .unwrap();
    }

    #[test]
    fn test_store_generate_insufficient_participants() {
        let store = DrawStore::new();
        let tournament = TournamentId::new();

        assert_eq!(
            store
                .generate(tournament, &participants(1), SeedingMode::Random)
                .unwrap_err(),
            Error::InsufficientParticipants { found: 1 }
        );

        // Nothing was stored.
        assert_eq!(store.matches(tournament), None);
    }

    #[test]
    fn test_store_regenerate() {
        let store = DrawStore::new();
        let tournament = TournamentId::new();
        let entrants = participants(4);

        let first = store
            .generate(tournament, &entrants, SeedingMode::Standard)
            .unwrap();

        let second = store
            .regenerate(tournament, &entrants, SeedingMode::Standard)
            .unwrap();

        // Same shape, fresh matches.
        assert_eq!(first.len(), second.len());
        assert!(second.iter().all(|m| !first.iter().any(|f| f.id == m.id)));
        assert_eq!(store.matches(tournament).unwrap(), second);

        // A failing regeneration leaves the old draw in place.
        assert_eq!(
            store
                .regenerate(tournament, &participants(0), SeedingMode::Standard)
                .unwrap_err(),
            Error::InsufficientParticipants { found: 0 }
        );
        assert_eq!(store.matches(tournament).unwrap(), second);
    }

    #[test]
    fn test_store_remove() {
        let store = DrawStore::new();
        let tournament = TournamentId::new();

        assert_eq!(store.remove(tournament), None);

        let matches = store
            .generate(tournament, &participants(2), SeedingMode::Random)
            .unwrap();

        assert_eq!(store.remove(tournament), Some(matches));
        assert_eq!(store.matches(tournament), None);
    }

    #[test]
    fn test_store_report_result_errors() {
        let store = DrawStore::new();
        let tournament = TournamentId::new();
        let entrants = participants(4);

        let outsider = ParticipantId::new();

        assert_eq!(
            store
                .report_result(tournament, MatchId::new(), outsider, None)
                .unwrap_err(),
            Error::DrawNotFound { tournament }
        );

        let matches = store
            .generate(tournament, &entrants, SeedingMode::Standard)
            .unwrap();
        let first = at(&matches, 1, 1);

        let unknown = MatchId::new();
        assert_eq!(
            store
                .report_result(tournament, unknown, entrants[0].id, None)
                .unwrap_err(),
            Error::MatchNotFound { match_id: unknown }
        );

        // The winner must be one of the two players of the match.
        assert_eq!(
            store
                .report_result(tournament, first.id, outsider, None)
                .unwrap_err(),
            Error::InvalidWinner {
                match_id: first.id,
                winner: outsider
            }
        );

        store
            .report_result(tournament, first.id, entrants[0].id, None)
            .unwrap();

        assert_eq!(
            store
                .report_result(tournament, first.id, entrants[0].id, None)
                .unwrap_err(),
            Error::ResultAlreadyRecorded { match_id: first.id }
        );
    }

    #[test]
    fn test_store_play_through() {
        let store = DrawStore::new();
        let tournament = TournamentId::new();
        let entrants = participants(4);

        let matches = store
            .generate(tournament, &entrants, SeedingMode::Standard)
            .unwrap();

        // Fold seeds [1, 4, 2, 3]: match 1 is seed 1 v seed 4, match 2 is
        // seed 2 v seed 3.
        let first = at(&matches, 1, 1);
        let second = at(&matches, 1, 2);

        let completed = store
            .report_result(
                tournament,
                first.id,
                entrants[0].id,
                Some("6-4 6-2".to_owned()),
            )
            .unwrap();
        assert_eq!(completed.status, MatchStatus::Completed);
        assert_eq!(completed.winner_id, Some(entrants[0].id));
        assert_eq!(completed.score.as_deref(), Some("6-4 6-2"));

        store
            .report_result(
                tournament,
                second.id,
                entrants[2].id,
                Some("7-5 6-7 6-3".to_owned()),
            )
            .unwrap();

        // Both winners landed in the final, odd feeder first.
        let current = store.matches(tournament).unwrap();
        let r#final = at(&current, 2, 1);
        assert_eq!(r#final.player1_id, Some(entrants[0].id));
        assert_eq!(r#final.player2_id, Some(entrants[2].id));
        assert_eq!(r#final.status, MatchStatus::Scheduled);

        let champion = store
            .report_result(tournament, r#final.id, entrants[2].id, None)
            .unwrap();
        assert_eq!(champion.winner_id, Some(entrants[2].id));
        assert_eq!(champion.next_match_id, None);
    }

    #[test]
    fn test_store_play_through_with_bye() {
        let store = DrawStore::new();
        let tournament = TournamentId::new();
        let entrants = participants(3);

        let matches = store
            .generate(tournament, &entrants, SeedingMode::Standard)
            .unwrap();

        // Seed 1 already advanced by walkover at generation time.
        let bye = at(&matches, 1, 1);
        assert_eq!(bye.status, MatchStatus::Completed);
        assert_eq!(
            store
                .report_result(tournament, bye.id, entrants[0].id, None)
                .unwrap_err(),
            Error::ResultAlreadyRecorded { match_id: bye.id }
        );

        let played = at(&matches, 1, 2);
        store
            .report_result(tournament, played.id, entrants[1].id, None)
            .unwrap();

        let current = store.matches(tournament).unwrap();
        let r#final = at(&current, 2, 1);
        assert_eq!(r#final.player1_id, Some(entrants[0].id));
        assert_eq!(r#final.player2_id, Some(entrants[1].id));
    }
}
