//! # tennis-draw
//!
//! This crate contains the items required to build single elimination draws for
//! tennis tournaments and to advance winners through them.
//!
//! Important types:
//! - [`SingleElimination`]: Builds the complete match tree for a draw, with byes
//! resolved and trivially decided winners already advanced.
//! - [`Match`]: A single match of two players, linked forward to the match its
//! winner feeds into.
//! - [`Participant`]: An entrant in the draw, an opaque id plus optional display
//! fields.
//! - [`SeedingMode`]: How the input list is placed into the bracket, either by
//! uniform shuffle or by standard fold seeding.
//! - [`DrawStore`]: An in-memory draw registry which serializes draw generation
//! and result reporting per store.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to the data model.

pub mod seeding;
pub mod store;

mod id;
mod single_elimination;

pub use id::{MatchId, ParticipantId, TournamentId};
pub use single_elimination::{advance_winner, SingleElimination};
pub use store::DrawStore;

use thiserror::Error;

use std::result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

/// The errors surfaced by the [`DrawStore`].
///
/// Building a draw from a valid participant list never fails; every variant
/// here belongs to the service boundary around the builder.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("not enough participants to generate a draw: need at least 2, found {found}")]
    InsufficientParticipants { found: usize },
    #[error("a bracket already exists for tournament {tournament}")]
    BracketAlreadyExists { tournament: TournamentId },
    #[error("no draw exists for tournament {tournament}")]
    DrawNotFound { tournament: TournamentId },
    #[error("no match {match_id} exists in the draw")]
    MatchNotFound { match_id: MatchId },
    #[error("winner {winner} is not a player of match {match_id}")]
    InvalidWinner {
        match_id: MatchId,
        winner: ParticipantId,
    },
    #[error("match {match_id} already has a recorded result")]
    ResultAlreadyRecorded { match_id: MatchId },
}

/// An entrant in a draw.
///
/// The id is the only field with meaning to the builder. The position of a
/// `Participant` in the input list is its seed rank when using
/// [`SeedingMode::Standard`] and carries no meaning when using
/// [`SeedingMode::Random`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    /// Optional display name, never read by the builder.
    pub name: Option<String>,
}

impl Participant {
    /// Creates a new `Participant` with the given `id` and no display fields.
    #[inline]
    pub fn new(id: ParticipantId) -> Self {
        Self { id, name: None }
    }

    /// Creates a new `Participant` with a display name.
    #[inline]
    pub fn with_name<T>(id: ParticipantId, name: T) -> Self
    where
        T: ToString,
    {
        Self {
            id,
            name: Some(name.to_string()),
        }
    }
}

/// How the participant list is placed into round 1 of the bracket.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeedingMode {
    /// Shuffle the participants uniformly before pairing them.
    #[default]
    Random,
    /// Fold seeding: seed 1 plays seed n, seed 2 plays seed n-1, and so on,
    /// with seed ranks taken from the input order.
    Standard,
}

/// The state of a [`Match`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchStatus {
    /// Not yet played. One or both player slots may still be empty, waiting on
    /// earlier matches.
    #[default]
    Scheduled,
    /// Has a recorded winner. Matches decided by a bye are also `Completed`.
    Completed,
    /// A round-1 match with no participants at all, never to be played.
    Bye,
}

/// A match of a single elimination draw.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub id: MatchId,
    /// 1-based. Round 1 is the first round played, the highest round is the
    /// final.
    pub round_number: u32,
    /// 1-based position within the round, ascending in bracket order.
    pub match_number_in_round: u32,
    pub player1_id: Option<ParticipantId>,
    pub player2_id: Option<ParticipantId>,
    pub status: MatchStatus,
    pub winner_id: Option<ParticipantId>,
    /// Free-text score, or [`Match::BYE_SCORE`] when decided by walkover.
    pub score: Option<String>,
    /// The match in `round_number + 1` the winner feeds into. `None` for the
    /// final.
    pub next_match_id: Option<MatchId>,
}

impl Match {
    /// The score recorded for a match decided by walkover.
    pub const BYE_SCORE: &'static str = "Bye";

    /// Creates a new empty `Match` at the given bracket position with a fresh
    /// id.
    pub fn new(round_number: u32, match_number_in_round: u32) -> Self {
        Self {
            id: MatchId::new(),
            round_number,
            match_number_in_round,
            player1_id: None,
            player2_id: None,
            status: MatchStatus::Scheduled,
            winner_id: None,
            score: None,
            next_match_id: None,
        }
    }

    /// Returns `true` if `player` occupies one of the two slots of the match.
    #[inline]
    pub fn has_player(&self, player: ParticipantId) -> bool {
        self.player1_id == Some(player) || self.player2_id == Some(player)
    }

    /// Returns `true` if the winner of this match goes into the `player1_id`
    /// slot of the next match.
    ///
    /// Matches `2k - 1` and `2k` of a round feed match `k` of the next round;
    /// the odd-numbered feeder fills the first slot, the even-numbered feeder
    /// the second.
    #[inline]
    pub fn feeds_first_slot(&self) -> bool {
        self.match_number_in_round % 2 == 1
    }
}
