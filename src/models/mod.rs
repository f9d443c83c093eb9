//! Data structures for the karate tournament: tournaments, players, matches.

mod bout;
mod player;
mod tournament;

pub use bout::{
    Match, MatchId, MatchStatus, PointChange, ScoreBreakdown, ScoreCategory, Side, WARNING_LIMIT,
};
pub use player::{Player, PlayerId};
pub use tournament::{rounds_for_size, Tournament, TournamentId, TournamentStatus, BRACKET_SIZES};
