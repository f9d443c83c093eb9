//! Advancement: carry winners forward, resolve byes, keep the tournament round current.

use crate::error::TournamentError;
use crate::models::{Match, PlayerId, Side, TournamentId, TournamentStatus};
use crate::store::Store;

/// Whether any round-one slot under the match at (`round`, `position`) holds a player.
pub fn subtree_occupied(round_one: &[Match], round: u32, position: u32) -> bool {
    let span = 1u32 << (round - 1);
    let first = (position - 1) * span + 1;
    let last = position * span;
    round_one
        .iter()
        .filter(|m| (first..=last).contains(&m.position))
        .any(|m| m.player1_id.is_some() || m.player2_id.is_some())
}

/// Position in the previous round of the match feeding `side`.
fn feeder_position(position: u32, side: Side) -> u32 {
    match side {
        Side::First => 2 * position - 1,
        Side::Second => 2 * position,
    }
}

/// A slot nobody can ever reach.
fn is_dead_slot(round_one: &[Match], m: &Match, side: Side) -> bool {
    if m.round == 1 {
        m.player(side).is_none()
    } else {
        !subtree_occupied(round_one, m.round - 1, feeder_position(m.position, side))
    }
}

/// Match that will never have a player (whole subtree empty).
pub fn is_void(round_one: &[Match], m: &Match) -> bool {
    is_dead_slot(round_one, m, Side::First) && is_dead_slot(round_one, m, Side::Second)
}

/// Walkover winner: the only player seated, when the other slot is dead.
fn bye_winner(round_one: &[Match], m: &Match) -> Option<PlayerId> {
    if m.is_completed() {
        return None;
    }
    [Side::First, Side::Second].into_iter().find_map(|side| {
        m.player(side)
            .filter(|_| is_dead_slot(round_one, m, side.opponent()))
    })
}

/// Complete `m` for `winner_id` and seat the winner in the next round.
///
/// The next-round match is looked up before anything is written, so a broken
/// bracket leaves the store untouched. Completing the final completes the
/// tournament. Returns the completed match.
pub(crate) fn complete_and_advance<S: Store + ?Sized>(
    store: &mut S,
    mut m: Match,
    winner_id: PlayerId,
    bye: bool,
) -> Result<Match, TournamentError> {
    let mut tournament = store.tournament(m.tournament_id)?;
    let next = if tournament.is_final_round(m.round) {
        None
    } else {
        let (round, position, side) = m.next_slot();
        Some((store.match_at(m.tournament_id, round, position)?, side))
    };

    if bye {
        m.finish_as_bye(winner_id);
    } else {
        m.finish(winner_id);
    }
    store.update_match(m.clone())?;
    log::info!(
        "Match round {} position {} completed{}: winner {} ({}-{})",
        m.round,
        m.position,
        if bye { " by bye" } else { "" },
        winner_id,
        m.player1_score,
        m.player2_score
    );

    match next {
        None => {
            tournament.status = TournamentStatus::Completed;
            tournament.champion = Some(winner_id);
            tournament.current_round = tournament.total_rounds;
            log::info!("Tournament {:?} completed, champion {}", tournament.name, winner_id);
            store.update_tournament(tournament)?;
        }
        Some((mut next, side)) => {
            next.seat(side, winner_id);
            store.update_match(next.clone())?;
            let round_one = store.matches_by_round(m.tournament_id, 1);
            if let Some(walkover) = bye_winner(&round_one, &next) {
                complete_and_advance(store, next, walkover, true)?;
            }
            refresh_current_round(store, m.tournament_id)?;
        }
    }
    Ok(m)
}

/// Complete every round-one bye and carry those players forward.
pub fn resolve_byes<S: Store + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<(), TournamentError> {
    let round_one = store.matches_by_round(tournament_id, 1);
    for m in &round_one {
        if let Some(winner) = bye_winner(&round_one, m) {
            let fresh = store.get_match(m.id)?;
            complete_and_advance(store, fresh, winner, true)?;
        }
    }
    refresh_current_round(store, tournament_id)
}

/// Set `current_round` to the lowest round with an unfinished, non-void match.
fn refresh_current_round<S: Store + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<(), TournamentError> {
    let mut tournament = store.tournament(tournament_id)?;
    if tournament.status != TournamentStatus::Active {
        return Ok(());
    }
    let matches = store.matches_by_tournament(tournament_id);
    let round_one: Vec<Match> = matches.iter().filter(|m| m.round == 1).cloned().collect();
    let current = matches
        .iter()
        .filter(|m| !m.is_completed() && !is_void(&round_one, m))
        .map(|m| m.round)
        .min()
        .unwrap_or(tournament.total_rounds);
    if current != tournament.current_round {
        tournament.current_round = current;
        store.update_tournament(tournament)?;
    }
    Ok(())
}
