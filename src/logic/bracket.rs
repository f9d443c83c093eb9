//! Bracket generation: seed-order pairings for round one, empty slots after.

use crate::error::TournamentError;
use crate::logic::advancement::resolve_byes;
use crate::models::{
    rounds_for_size, Match, Player, PlayerId, Tournament, TournamentId, TournamentStatus,
};
use crate::store::Store;

/// Build every match of a single-elimination bracket.
///
/// Round one pairs seeds (1,2), (3,4), ... in order; missing seeds leave empty
/// slots. Round `r` has `size / 2^r` placeholder matches, down to a single final.
/// Any power-of-two size of at least 2 is accepted here; tournament creation
/// is what restricts sizes to 16 and 32.
pub fn build_bracket(
    tournament: &Tournament,
    players: &[Player],
) -> Result<Vec<Match>, TournamentError> {
    let size = tournament.size;
    if size < 2 || !size.is_power_of_two() {
        return Err(TournamentError::InvalidBracketSize(size));
    }
    if players.len() > size as usize {
        return Err(TournamentError::TooManyPlayers {
            capacity: size,
            count: players.len(),
        });
    }
    if players.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers);
    }

    let mut seeded: Vec<&Player> = players.iter().collect();
    seeded.sort_by_key(|p| p.position);
    let mut slots: Vec<Option<PlayerId>> = seeded.iter().map(|p| Some(p.id)).collect();
    slots.resize(size as usize, None);

    let mut matches: Vec<Match> = slots
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| Match::new(tournament.id, 1, i as u32 + 1, pair[0], pair[1]))
        .collect();

    for round in 2..=rounds_for_size(size) {
        let count = size >> round;
        matches.extend((1..=count).map(|position| Match::new(tournament.id, round, position, None, None)));
    }
    Ok(matches)
}

/// Generate and store the bracket, then start the tournament.
///
/// Byes are resolved straight away, so the returned matches may already show
/// some round-one winners seated in round two.
pub fn generate_bracket<S: Store + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<Vec<Match>, TournamentError> {
    let mut tournament = store.tournament(tournament_id)?;
    if tournament.status != TournamentStatus::Setup {
        return Err(TournamentError::InvalidState("bracket already generated"));
    }
    let players = store.players_by_tournament(tournament_id);
    let matches = build_bracket(&tournament, &players)?;

    for m in &matches {
        store.insert_match(m.clone());
    }
    tournament.status = TournamentStatus::Active;
    tournament.current_round = 1;
    store.update_tournament(tournament.clone())?;
    log::info!(
        "Generated bracket for {:?}: {} players, {} matches",
        tournament.name,
        players.len(),
        matches.len()
    );

    resolve_byes(store, tournament_id)?;
    Ok(store.matches_by_tournament(tournament_id))
}
