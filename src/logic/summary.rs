//! Read-side helpers for displaying a bracket.

use crate::error::TournamentError;
use crate::logic::advancement::is_void;
use crate::models::{Match, MatchId, MatchStatus, Player, PlayerId, Tournament, TournamentId};
use crate::store::Store;
use serde::Serialize;

/// Display name of a round: "Final", "Semi Finals", "Quarter Finals" or "Round N".
pub fn round_name(round: u32, total_rounds: u32) -> String {
    match total_rounds.checked_sub(round) {
        Some(0) => "Final".to_string(),
        Some(1) => "Semi Finals".to_string(),
        Some(2) => "Quarter Finals".to_string(),
        _ => format!("Round {}", round),
    }
}

/// Matches needed to decide a full single-elimination bracket.
pub fn total_match_count(size: u32) -> u32 {
    size.saturating_sub(1)
}

/// First match waiting to be fought.
pub fn next_match(matches: &[Match]) -> Option<&Match> {
    matches
        .iter()
        .find(|m| m.status == MatchStatus::Pending && m.is_ready())
}

/// First match currently being fought.
pub fn current_match(matches: &[Match]) -> Option<&Match> {
    matches.iter().find(|m| m.status == MatchStatus::InProgress)
}

fn player_name(players: &[Player], id: Option<PlayerId>) -> Option<&str> {
    let id = id?;
    players.iter().find(|p| p.id == id).map(|p| p.name.as_str())
}

/// "Alice vs Bob", or "TBD vs TBD" until both players are known.
pub fn match_title(m: &Match, players: &[Player]) -> String {
    match (
        player_name(players, m.player1_id),
        player_name(players, m.player2_id),
    ) {
        (Some(a), Some(b)) => format!("{} vs {}", a, b),
        _ => "TBD vs TBD".to_string(),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RoundSummary {
    pub round: u32,
    pub name: String,
    pub matches: Vec<Match>,
}

/// Whole bracket for display, with progress counters.
#[derive(Clone, Debug, Serialize)]
pub struct BracketSummary {
    pub tournament: Tournament,
    pub players: Vec<Player>,
    pub rounds: Vec<RoundSummary>,
    /// Completed matches, byes included.
    pub completed_matches: usize,
    /// Matches that will be decided (void matches excluded).
    pub total_matches: usize,
    pub next_match: Option<MatchId>,
    pub current_match: Option<MatchId>,
}

pub fn bracket_summary<S: Store + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<BracketSummary, TournamentError> {
    let tournament = store.tournament(tournament_id)?;
    let players = store.players_by_tournament(tournament_id);
    let matches = store.matches_by_tournament(tournament_id);
    let round_one: Vec<Match> = matches.iter().filter(|m| m.round == 1).cloned().collect();

    let live: Vec<&Match> = matches.iter().filter(|m| !is_void(&round_one, m)).collect();
    let completed_matches = live.iter().filter(|m| m.is_completed()).count();

    let rounds = (1..=tournament.total_rounds)
        .map(|round| RoundSummary {
            round,
            name: round_name(round, tournament.total_rounds),
            matches: matches.iter().filter(|m| m.round == round).cloned().collect(),
        })
        .filter(|r| !r.matches.is_empty())
        .collect();

    Ok(BracketSummary {
        next_match: next_match(&matches).map(|m| m.id),
        current_match: current_match(&matches).map(|m| m.id),
        total_matches: live.len(),
        completed_matches,
        rounds,
        players,
        tournament,
    })
}
