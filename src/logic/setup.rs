//! Setup phase: create tournaments, register and seed players.

use crate::error::TournamentError;
use crate::models::{Player, PlayerId, Tournament, TournamentId, TournamentStatus};
use crate::store::Store;
use rand::seq::SliceRandom;
use std::io::Read;

/// Create a tournament in Setup and persist it.
pub fn create_tournament<S: Store + ?Sized>(
    store: &mut S,
    name: &str,
    size: u32,
) -> Result<Tournament, TournamentError> {
    let tournament = Tournament::new(name, size)?;
    log::info!(
        "Created tournament {:?} ({} players, {} rounds)",
        tournament.name,
        tournament.size,
        tournament.total_rounds
    );
    store.insert_tournament(tournament.clone());
    Ok(tournament)
}

/// Delete a tournament with all its players and matches.
pub fn delete_tournament<S: Store + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<(), TournamentError> {
    store.delete_tournament(tournament_id)?;
    log::info!("Deleted tournament {}", tournament_id);
    Ok(())
}

fn setup_tournament<S: Store + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    let tournament = store.tournament(tournament_id)?;
    if tournament.status != TournamentStatus::Setup {
        return Err(TournamentError::InvalidState(
            "players can only change before the bracket is generated",
        ));
    }
    Ok(tournament)
}

/// Trimmed, non-empty name that no other player in `existing` uses (case-insensitive).
fn validate_name(
    name: &str,
    existing: &[Player],
    except: Option<PlayerId>,
) -> Result<String, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let is_duplicate = existing
        .iter()
        .filter(|p| Some(p.id) != except)
        .any(|p| p.name.eq_ignore_ascii_case(name));
    if is_duplicate {
        return Err(TournamentError::DuplicatePlayerName(name.to_string()));
    }
    Ok(name.to_string())
}

/// Register a player; the seed position is the next free one.
pub fn add_player<S: Store + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    name: &str,
) -> Result<Player, TournamentError> {
    let tournament = setup_tournament(&*store, tournament_id)?;
    let existing = store.players_by_tournament(tournament_id);
    if existing.len() >= tournament.size as usize {
        return Err(TournamentError::TooManyPlayers {
            capacity: tournament.size,
            count: existing.len() + 1,
        });
    }
    let name = validate_name(name, &existing, None)?;
    let player = Player::new(tournament_id, name, existing.len() as u32 + 1);
    store.insert_player(player.clone());
    Ok(player)
}

/// Rename a player. Allowed in any status; seeding is unaffected.
pub fn rename_player<S: Store + ?Sized>(
    store: &mut S,
    player_id: PlayerId,
    name: &str,
) -> Result<Player, TournamentError> {
    let mut player = store.player(player_id)?;
    let existing = store.players_by_tournament(player.tournament_id);
    player.name = validate_name(name, &existing, Some(player_id))?;
    store.update_player(player.clone())?;
    Ok(player)
}

/// Remove a player during setup and close the gap in seed positions.
pub fn remove_player<S: Store + ?Sized>(
    store: &mut S,
    player_id: PlayerId,
) -> Result<(), TournamentError> {
    let player = store.player(player_id)?;
    setup_tournament(&*store, player.tournament_id)?;
    store.delete_player(player_id)?;
    let remaining = store.players_by_tournament(player.tournament_id);
    renumber(store, remaining)
}

/// Randomly permute seed positions (setup only). Returns players in new seed order.
pub fn shuffle_seeds<S: Store + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<Vec<Player>, TournamentError> {
    setup_tournament(&*store, tournament_id)?;
    let mut players = store.players_by_tournament(tournament_id);
    players.shuffle(&mut rand::thread_rng());
    renumber(store, players)?;
    Ok(store.players_by_tournament(tournament_id))
}

/// Assign positions 1..=n in the given order.
fn renumber<S: Store + ?Sized>(store: &mut S, players: Vec<Player>) -> Result<(), TournamentError> {
    for (i, mut p) in players.into_iter().enumerate() {
        let position = i as u32 + 1;
        if p.position != position {
            p.position = position;
            store.update_player(p)?;
        }
    }
    Ok(())
}

/// Import a roster from CSV: one name per row in the first column.
///
/// A leading `name` header is skipped, as are blank rows. Every row is checked
/// before anything is inserted, so a bad roster adds nobody.
pub fn import_roster<S: Store + ?Sized, R: Read>(
    store: &mut S,
    tournament_id: TournamentId,
    reader: R,
) -> Result<Vec<Player>, TournamentError> {
    let tournament = setup_tournament(&*store, tournament_id)?;
    let mut roster = store.players_by_tournament(tournament_id);
    let first_new = roster.len();

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let name = record.get(0).unwrap_or("");
        if name.is_empty() || (row == 0 && name.eq_ignore_ascii_case("name")) {
            continue;
        }
        if roster.len() >= tournament.size as usize {
            return Err(TournamentError::TooManyPlayers {
                capacity: tournament.size,
                count: roster.len() + 1,
            });
        }
        let name = validate_name(name, &roster, None)?;
        roster.push(Player::new(tournament_id, name, roster.len() as u32 + 1));
    }

    let added = roster.split_off(first_new);
    for p in &added {
        store.insert_player(p.clone());
    }
    log::info!(
        "Imported {} player(s) into tournament {}",
        added.len(),
        tournament_id
    );
    Ok(added)
}
