//! Tournament business logic: setup, bracket generation, scoring, advancement.

mod advancement;
mod bracket;
mod scoring;
mod setup;
mod summary;

pub use advancement::{is_void, resolve_byes, subtree_occupied};
pub use bracket::{build_bracket, generate_bracket};
pub use scoring::{clear_senshu, complete_match, record_point, start_match, toggle_senshu};
pub use setup::{
    add_player, create_tournament, delete_tournament, import_roster, remove_player,
    rename_player, shuffle_seeds,
};
pub use summary::{
    bracket_summary, current_match, match_title, next_match, round_name, total_match_count,
    BracketSummary, RoundSummary,
};
