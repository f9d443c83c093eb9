//! Match between two players and the karate scoring rules it enforces.

use crate::error::TournamentError;
use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Warnings that disqualify a player on the spot.
pub const WARNING_LIMIT: u32 = 5;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Which slot of a match a player occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Scoring category a referee can award.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Ippon,
    Wazari,
    Yuko,
    Warning,
}

impl ScoreCategory {
    /// Points this category adds to the total (warnings add none).
    pub fn points(self) -> u32 {
        match self {
            ScoreCategory::Ippon => 3,
            ScoreCategory::Wazari => 2,
            ScoreCategory::Yuko => 1,
            ScoreCategory::Warning => 0,
        }
    }
}

/// Whether a scoring action awards or takes back a count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointChange {
    #[default]
    Add,
    Remove,
}

/// Per-side tally of awarded categories.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub ippon: u32,
    pub wazari: u32,
    pub yuko: u32,
    pub warnings: u32,
    /// First-score advantage; at most one side holds it.
    pub senshu: bool,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.ippon * ScoreCategory::Ippon.points()
            + self.wazari * ScoreCategory::Wazari.points()
            + self.yuko * ScoreCategory::Yuko.points()
    }

    pub fn is_disqualified(&self) -> bool {
        self.warnings >= WARNING_LIMIT
    }

    /// Add or remove one count; removal never goes below zero.
    pub fn apply(&mut self, category: ScoreCategory, change: PointChange) {
        let count = match category {
            ScoreCategory::Ippon => &mut self.ippon,
            ScoreCategory::Wazari => &mut self.wazari,
            ScoreCategory::Yuko => &mut self.yuko,
            ScoreCategory::Warning => &mut self.warnings,
        };
        *count = match change {
            PointChange::Add => count.saturating_add(1),
            PointChange::Remove => count.saturating_sub(1),
        };
    }
}

/// A single bracket match. Later-round matches start with empty slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1-based; the final is round `total_rounds`.
    pub round: u32,
    /// 1-based position within the round.
    pub position: u32,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub player1_score: u32,
    pub player2_score: u32,
    pub player1_detail: ScoreBreakdown,
    pub player2_detail: ScoreBreakdown,
    pub status: MatchStatus,
    /// Set exactly when the match is completed.
    pub winner_id: Option<PlayerId>,
    /// Decided by walkover (no opponent could ever arrive).
    pub bye: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Match {
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        position: u32,
        player1_id: Option<PlayerId>,
        player2_id: Option<PlayerId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            position,
            player1_id,
            player2_id,
            player1_score: 0,
            player2_score: 0,
            player1_detail: ScoreBreakdown::default(),
            player2_detail: ScoreBreakdown::default(),
            status: MatchStatus::Pending,
            winner_id: None,
            bye: false,
            start_time: None,
            end_time: None,
        }
    }

    pub fn player(&self, side: Side) -> Option<PlayerId> {
        match side {
            Side::First => self.player1_id,
            Side::Second => self.player2_id,
        }
    }

    /// Slot occupied by `player_id`, if they are in this match.
    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        if self.player1_id == Some(player_id) {
            Some(Side::First)
        } else if self.player2_id == Some(player_id) {
            Some(Side::Second)
        } else {
            None
        }
    }

    pub fn detail(&self, side: Side) -> &ScoreBreakdown {
        match side {
            Side::First => &self.player1_detail,
            Side::Second => &self.player2_detail,
        }
    }

    fn detail_mut(&mut self, side: Side) -> &mut ScoreBreakdown {
        match side {
            Side::First => &mut self.player1_detail,
            Side::Second => &mut self.player2_detail,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::First => self.player1_score,
            Side::Second => self.player2_score,
        }
    }

    /// Both slots filled: the match can be fought.
    pub fn is_ready(&self) -> bool {
        self.player1_id.is_some() && self.player2_id.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Round, position and slot the winner of this match moves into.
    pub fn next_slot(&self) -> (u32, u32, Side) {
        let side = if self.position % 2 == 1 {
            Side::First
        } else {
            Side::Second
        };
        (self.round + 1, self.position.div_ceil(2), side)
    }

    pub fn seat(&mut self, side: Side, player_id: PlayerId) {
        match side {
            Side::First => self.player1_id = Some(player_id),
            Side::Second => self.player2_id = Some(player_id),
        }
    }

    fn ensure_scorable(&self) -> Result<(), TournamentError> {
        if self.is_completed() {
            return Err(TournamentError::InvalidState("match already completed"));
        }
        if !self.is_ready() {
            return Err(TournamentError::MatchNotReady);
        }
        Ok(())
    }

    /// Move Pending -> InProgress and stamp the start time (no-op once running).
    pub fn begin(&mut self) -> Result<(), TournamentError> {
        self.ensure_scorable()?;
        if self.status == MatchStatus::Pending {
            self.status = MatchStatus::InProgress;
        }
        self.start_time.get_or_insert_with(Utc::now);
        Ok(())
    }

    /// Apply a scoring action and recompute totals.
    ///
    /// Returns the side that just reached [`WARNING_LIMIT`], if any; the caller
    /// is expected to complete the match for the opponent.
    pub fn record_point(
        &mut self,
        side: Side,
        category: ScoreCategory,
        change: PointChange,
    ) -> Result<Option<Side>, TournamentError> {
        self.begin()?;
        self.detail_mut(side).apply(category, change);
        self.player1_score = self.player1_detail.total();
        self.player2_score = self.player2_detail.total();
        if category == ScoreCategory::Warning && self.detail(side).is_disqualified() {
            return Ok(Some(side));
        }
        Ok(None)
    }

    /// Give senshu to `side`; the opponent loses it.
    pub fn award_senshu(&mut self, side: Side) -> Result<(), TournamentError> {
        self.begin()?;
        self.detail_mut(side).senshu = true;
        self.detail_mut(side.opponent()).senshu = false;
        Ok(())
    }

    pub fn clear_senshu(&mut self) -> Result<(), TournamentError> {
        self.ensure_scorable()?;
        self.player1_detail.senshu = false;
        self.player2_detail.senshu = false;
        Ok(())
    }

    /// Winning side under the current tally.
    ///
    /// A disqualified side loses outright; otherwise the higher score wins and
    /// an equal score goes to the single senshu holder.
    pub fn winning_side(&self) -> Result<Side, TournamentError> {
        if !self.is_ready() {
            return Err(TournamentError::MatchNotReady);
        }
        if self.player1_detail.is_disqualified() {
            return Ok(Side::Second);
        }
        if self.player2_detail.is_disqualified() {
            return Ok(Side::First);
        }
        match self.player1_score.cmp(&self.player2_score) {
            Ordering::Greater => Ok(Side::First),
            Ordering::Less => Ok(Side::Second),
            Ordering::Equal => match (self.player1_detail.senshu, self.player2_detail.senshu) {
                (true, false) => Ok(Side::First),
                (false, true) => Ok(Side::Second),
                _ => Err(TournamentError::UnresolvedTie),
            },
        }
    }

    /// Mark completed with `winner_id`; stamps start time too if the match never ran.
    pub fn finish(&mut self, winner_id: PlayerId) {
        let now = Utc::now();
        self.status = MatchStatus::Completed;
        self.winner_id = Some(winner_id);
        self.start_time.get_or_insert(now);
        self.end_time = Some(now);
    }

    /// Complete by walkover for the only player present.
    pub fn finish_as_bye(&mut self, winner_id: PlayerId) {
        self.bye = true;
        self.finish(winner_id);
    }
}
