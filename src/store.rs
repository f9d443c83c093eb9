//! Persistence seam: the rule core talks to a [`Store`], never to concrete maps.
//!
//! [`MemoryStore`] keeps everything in `HashMap`s keyed by the generated ids;
//! filtered queries are linear scans sorted by seed or bracket position.

use crate::error::TournamentError;
use crate::models::{Match, MatchId, Player, PlayerId, Tournament, TournamentId};
use std::collections::HashMap;

/// CRUD over tournaments, players and matches.
///
/// Values go in and out by copy so an implementation can sit on any backend.
pub trait Store {
    fn insert_tournament(&mut self, tournament: Tournament);
    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError>;
    /// All tournaments, newest first.
    fn tournaments(&self) -> Vec<Tournament>;
    fn update_tournament(&mut self, tournament: Tournament) -> Result<(), TournamentError>;
    /// Remove a tournament together with its players and matches.
    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), TournamentError>;

    fn insert_player(&mut self, player: Player);
    fn player(&self, id: PlayerId) -> Result<Player, TournamentError>;
    /// Players of a tournament ordered by seed position.
    fn players_by_tournament(&self, tournament_id: TournamentId) -> Vec<Player>;
    fn update_player(&mut self, player: Player) -> Result<(), TournamentError>;
    fn delete_player(&mut self, id: PlayerId) -> Result<(), TournamentError>;

    fn insert_match(&mut self, m: Match);
    fn get_match(&self, id: MatchId) -> Result<Match, TournamentError>;
    /// Matches ordered by round, then position.
    fn matches_by_tournament(&self, tournament_id: TournamentId) -> Vec<Match>;
    /// Matches of one round ordered by position.
    fn matches_by_round(&self, tournament_id: TournamentId, round: u32) -> Vec<Match>;
    fn update_match(&mut self, m: Match) -> Result<(), TournamentError>;

    fn match_at(
        &self,
        tournament_id: TournamentId,
        round: u32,
        position: u32,
    ) -> Result<Match, TournamentError> {
        self.matches_by_round(tournament_id, round)
            .into_iter()
            .find(|m| m.position == position)
            .ok_or(TournamentError::SlotNotFound { round, position })
    }
}

/// In-memory [`Store`] used by the web binary and the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: HashMap<TournamentId, Tournament>,
    players: HashMap<PlayerId, Player>,
    matches: HashMap<MatchId, Match>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn insert_tournament(&mut self, tournament: Tournament) {
        self.tournaments.insert(tournament.id, tournament);
    }

    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    fn tournaments(&self) -> Vec<Tournament> {
        let mut all: Vec<_> = self.tournaments.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    fn update_tournament(&mut self, tournament: Tournament) -> Result<(), TournamentError> {
        let slot = self
            .tournaments
            .get_mut(&tournament.id)
            .ok_or(TournamentError::TournamentNotFound(tournament.id))?;
        *slot = tournament;
        Ok(())
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), TournamentError> {
        self.tournaments
            .remove(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        self.players.retain(|_, p| p.tournament_id != id);
        self.matches.retain(|_, m| m.tournament_id != id);
        Ok(())
    }

    fn insert_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    fn player(&self, id: PlayerId) -> Result<Player, TournamentError> {
        self.players
            .get(&id)
            .cloned()
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    fn players_by_tournament(&self, tournament_id: TournamentId) -> Vec<Player> {
        let mut players: Vec<_> = self
            .players
            .values()
            .filter(|p| p.tournament_id == tournament_id)
            .cloned()
            .collect();
        players.sort_by_key(|p| p.position);
        players
    }

    fn update_player(&mut self, player: Player) -> Result<(), TournamentError> {
        let slot = self
            .players
            .get_mut(&player.id)
            .ok_or(TournamentError::PlayerNotFound(player.id))?;
        *slot = player;
        Ok(())
    }

    fn delete_player(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        self.players
            .remove(&id)
            .map(|_| ())
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    fn insert_match(&mut self, m: Match) {
        self.matches.insert(m.id, m);
    }

    fn get_match(&self, id: MatchId) -> Result<Match, TournamentError> {
        self.matches
            .get(&id)
            .cloned()
            .ok_or(TournamentError::MatchNotFound(id))
    }

    fn matches_by_tournament(&self, tournament_id: TournamentId) -> Vec<Match> {
        let mut matches: Vec<_> = self
            .matches
            .values()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.round, m.position));
        matches
    }

    fn matches_by_round(&self, tournament_id: TournamentId, round: u32) -> Vec<Match> {
        let mut matches: Vec<_> = self
            .matches
            .values()
            .filter(|m| m.tournament_id == tournament_id && m.round == round)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.position);
        matches
    }

    fn update_match(&mut self, m: Match) -> Result<(), TournamentError> {
        let slot = self
            .matches
            .get_mut(&m.id)
            .ok_or(TournamentError::MatchNotFound(m.id))?;
        *slot = m;
        Ok(())
    }
}
