//! Karate tournament web app: library with models, bracket rules and the match timer.

pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod store;
pub mod timer;

pub use error::{ErrorKind, TournamentError};
pub use logic::{
    add_player, bracket_summary, build_bracket, clear_senshu, complete_match, create_tournament,
    delete_tournament, generate_bracket, import_roster, record_point, remove_player,
    rename_player, shuffle_seeds, start_match, toggle_senshu, BracketSummary,
};
pub use models::{
    Match, MatchId, MatchStatus, Player, PlayerId, PointChange, ScoreBreakdown, ScoreCategory,
    Side, Tournament, TournamentId, TournamentStatus,
};
pub use store::{MemoryStore, Store};
