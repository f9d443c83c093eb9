//! Live scoring: points, warnings, senshu and match completion.
//!
//! Each operation loads the match, applies the rule on a copy and only writes
//! back when it succeeded.

use crate::error::TournamentError;
use crate::logic::advancement::complete_and_advance;
use crate::models::{
    Match, MatchId, PlayerId, PointChange, ScoreCategory, TournamentStatus, WARNING_LIMIT,
};
use crate::store::Store;

fn active_match<S: Store + ?Sized>(store: &S, match_id: MatchId) -> Result<Match, TournamentError> {
    let m = store.get_match(match_id)?;
    let tournament = store.tournament(m.tournament_id)?;
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState("tournament is not running"));
    }
    Ok(m)
}

/// Put a ready match in progress.
pub fn start_match<S: Store + ?Sized>(
    store: &mut S,
    match_id: MatchId,
) -> Result<Match, TournamentError> {
    let mut m = active_match(&*store, match_id)?;
    m.begin()?;
    store.update_match(m.clone())?;
    Ok(m)
}

/// Award or take back one `category` count for `player_id`.
///
/// Reaching the warning limit completes the match for the opponent and
/// advances them; the completed match is returned in that case.
pub fn record_point<S: Store + ?Sized>(
    store: &mut S,
    match_id: MatchId,
    player_id: PlayerId,
    category: ScoreCategory,
    change: PointChange,
) -> Result<Match, TournamentError> {
    let mut m = active_match(&*store, match_id)?;
    let side = m
        .side_of(player_id)
        .ok_or(TournamentError::PlayerNotInMatch(player_id))?;
    let disqualified = m.record_point(side, category, change)?;
    log::debug!(
        "Match {}: {:?} {:?} for {} -> {}-{}",
        m.id,
        change,
        category,
        player_id,
        m.player1_score,
        m.player2_score
    );

    match disqualified {
        Some(side) => {
            let winner = m
                .player(side.opponent())
                .ok_or(TournamentError::MatchNotReady)?;
            log::info!(
                "Match {}: player {} disqualified after {} warnings",
                m.id,
                player_id,
                WARNING_LIMIT
            );
            complete_and_advance(store, m, winner, false)
        }
        None => {
            store.update_match(m.clone())?;
            Ok(m)
        }
    }
}

/// Give senshu to `player_id`; the opponent loses it.
pub fn toggle_senshu<S: Store + ?Sized>(
    store: &mut S,
    match_id: MatchId,
    player_id: PlayerId,
) -> Result<Match, TournamentError> {
    let mut m = active_match(&*store, match_id)?;
    let side = m
        .side_of(player_id)
        .ok_or(TournamentError::PlayerNotInMatch(player_id))?;
    m.award_senshu(side)?;
    store.update_match(m.clone())?;
    Ok(m)
}

/// Take senshu away from both players.
pub fn clear_senshu<S: Store + ?Sized>(
    store: &mut S,
    match_id: MatchId,
) -> Result<Match, TournamentError> {
    let mut m = active_match(&*store, match_id)?;
    m.clear_senshu()?;
    store.update_match(m.clone())?;
    Ok(m)
}

/// End the match on the current tally and advance the winner.
///
/// A tie without a single senshu holder is rejected with
/// [`TournamentError::UnresolvedTie`] and nothing changes.
pub fn complete_match<S: Store + ?Sized>(
    store: &mut S,
    match_id: MatchId,
) -> Result<Match, TournamentError> {
    let m = active_match(&*store, match_id)?;
    if m.is_completed() {
        return Err(TournamentError::InvalidState("match already completed"));
    }
    let side = m.winning_side()?;
    let winner = m.player(side).ok_or(TournamentError::MatchNotReady)?;
    complete_and_advance(store, m, winner, false)
}
