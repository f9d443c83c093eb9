//! Tournament and TournamentStatus.

use crate::error::TournamentError;
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// First-round capacities a tournament can be created with.
pub const BRACKET_SIZES: [u32; 2] = [16, 32];

/// Current phase of the tournament. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registering players; no bracket yet.
    #[default]
    Setup,
    /// Bracket generated, matches being fought.
    Active,
    /// Final decided.
    Completed,
}

/// A single-elimination tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// First-round capacity (number of player slots).
    pub size: u32,
    pub status: TournamentStatus,
    /// Lowest round that still has a match to fight.
    pub current_round: u32,
    /// log2(size); the final is round `total_rounds`.
    pub total_rounds: u32,
    pub created_at: DateTime<Utc>,
    /// Winner of the final, once the tournament is completed.
    pub champion: Option<PlayerId>,
}

impl Tournament {
    /// Create a new tournament in Setup. Size must be one of [`BRACKET_SIZES`].
    pub fn new(name: impl Into<String>, size: u32) -> Result<Self, TournamentError> {
        if !BRACKET_SIZES.contains(&size) {
            return Err(TournamentError::InvalidBracketSize(size));
        }
        let name: String = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size,
            status: TournamentStatus::Setup,
            current_round: 1,
            total_rounds: rounds_for_size(size),
            created_at: Utc::now(),
            champion: None,
        })
    }

    pub fn is_final_round(&self, round: u32) -> bool {
        round == self.total_rounds
    }
}

/// Number of elimination rounds for a power-of-two bracket size.
pub fn rounds_for_size(size: u32) -> u32 {
    size.trailing_zeros()
}
