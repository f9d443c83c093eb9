//! Error type shared by the rule core, the store and the timer.

use crate::models::{MatchId, PlayerId, TournamentId};
use thiserror::Error;

/// Broad category of a [`TournamentError`], used to pick an HTTP status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Referenced tournament, player or match is absent.
    NotFound,
    /// Input rejected by the rules (bad size, unresolved tie, ...).
    Validation,
    /// Operation not allowed in the current status.
    Conflict,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    /// Bracket is missing the match at this slot (store was edited behind our back).
    #[error("No match at round {round}, position {position}")]
    SlotNotFound { round: u32, position: u32 },

    #[error("Bracket size must be 16 or 32 (got {0})")]
    InvalidBracketSize(u32),

    #[error("Name must not be empty")]
    EmptyName,

    /// Names are unique per tournament, case-insensitive.
    #[error("A player named {0:?} already exists")]
    DuplicatePlayerName(String),

    #[error("Bracket holds {capacity} players (got {count})")]
    TooManyPlayers { capacity: u32, count: usize },

    #[error("Need at least 2 players to generate a bracket")]
    NotEnoughPlayers,

    #[error("Player {0} is not in this match")]
    PlayerNotInMatch(PlayerId),

    /// Both slots must be filled before a match can be scored or completed.
    #[error("Match is waiting for its players")]
    MatchNotReady,

    #[error("Match cannot end in a tie: adjust scores or give senshu to the player who scored first")]
    UnresolvedTie,

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Timer duration must be between 0:01 and 59:59")]
    InvalidTimerDuration,

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            TournamentNotFound(_) | PlayerNotFound(_) | MatchNotFound(_) | SlotNotFound { .. } => {
                ErrorKind::NotFound
            }
            InvalidState(_) => ErrorKind::Conflict,
            InvalidBracketSize(_)
            | EmptyName
            | DuplicatePlayerName(_)
            | TooManyPlayers { .. }
            | NotEnoughPlayers
            | PlayerNotInMatch(_)
            | MatchNotReady
            | UnresolvedTie
            | InvalidRoster(_)
            | InvalidTimerDuration => ErrorKind::Validation,
        }
    }
}

impl From<csv::Error> for TournamentError {
    fn from(e: csv::Error) -> Self {
        TournamentError::InvalidRoster(e.to_string())
    }
}
