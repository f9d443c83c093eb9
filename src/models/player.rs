//! Player data structure.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// A registered competitor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub tournament_id: TournamentId,
    /// Seed position, 1-based and contiguous within the tournament.
    pub position: u32,
}

impl Player {
    pub fn new(tournament_id: TournamentId, name: impl Into<String>, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tournament_id,
            position,
        }
    }
}
