//! Round and participation aggregates.

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use super::number::GuessNumber;

pub type RoundId = i64;
pub type PlayerId = i64;
pub type ParticipationId = i64;

/// Lifecycle state of a round. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    Waiting,
    Active,
    Resolved,
}

impl RoundState {
    /// Waiting and Active rounds are live.
    pub fn is_live(self) -> bool {
        !matches!(self, RoundState::Resolved)
    }

    /// Single-step forward transitions only: Waiting -> Active -> Resolved.
    pub fn can_advance_to(self, next: RoundState) -> bool {
        matches!(
            (self, next),
            (RoundState::Waiting, RoundState::Active) | (RoundState::Active, RoundState::Resolved)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundState::Waiting => "waiting",
            RoundState::Active => "active",
            RoundState::Resolved => "resolved",
        }
    }
}

/// Round row as stored by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    pub id: RoundId,
    pub created_at: OffsetDateTime,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub span: Duration,
    pub winning_number: Option<GuessNumber>,
    pub creator_id: PlayerId,
    pub state: RoundState,
    pub lock_version: i32,
    pub resolved_at: Option<OffsetDateTime>,
}

impl Round {
    /// Time since the countdown began. Negative if `now` precedes it.
    pub fn elapsed_at(&self, now: OffsetDateTime) -> Duration {
        now - self.start_time
    }

    /// A round is expired once strictly more than its span has elapsed.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.elapsed_at(now) > self.span
    }

    /// Time left before expiry, clamped at zero.
    pub fn time_left_at(&self, now: OffsetDateTime) -> Duration {
        let left = self.end_time - now;
        if left.is_negative() {
            Duration::ZERO
        } else {
            left
        }
    }
}

/// A player's membership in exactly one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participation {
    pub id: ParticipationId,
    pub round_id: RoundId,
    pub player_id: PlayerId,
    pub selected_number: Option<GuessNumber>,
    pub is_winner: bool,
    pub is_creator: bool,
    pub joined_at: OffsetDateTime,
}

impl Participation {
    /// Unselected participants never match a draw.
    pub fn matches(&self, winning: GuessNumber) -> bool {
        self.selected_number == Some(winning)
    }
}

/// Read projection of a round together with its participants in join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub round: Round,
    pub participants: Vec<Participation>,
    /// Countdown remaining when the view was taken; zero once expired
    pub time_left: Duration,
}

impl RoundView {
    pub fn at(round: Round, participants: Vec<Participation>, now: OffsetDateTime) -> Self {
        let time_left = round.time_left_at(now);
        Self {
            round,
            participants,
            time_left,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn participant(&self, player_id: PlayerId) -> Option<&Participation> {
        self.participants.iter().find(|p| p.player_id == player_id)
    }

    pub fn winners(&self) -> impl Iterator<Item = &Participation> {
        self.participants.iter().filter(|p| p.is_winner)
    }
}
