//! Round registry contract.

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use crate::domain::{
    DailyRoundStats, GuessNumber, Participation, PlayerId, Round, RoundId, RoundState,
};
use crate::errors::domain::DomainError;

/// Fields for a freshly created round. The registry assigns id and version
/// and seats the creator in the same write.
#[derive(Debug, Clone)]
pub struct NewRound {
    pub creator_id: PlayerId,
    pub creator_number: Option<GuessNumber>,
    pub created_at: OffsetDateTime,
    pub span: Duration,
}

impl NewRound {
    pub fn new(creator_id: PlayerId, created_at: OffsetDateTime, span: Duration) -> Self {
        Self {
            creator_id,
            creator_number: None,
            created_at,
            span,
        }
    }

    pub fn with_creator_number(mut self, number: Option<GuessNumber>) -> Self {
        self.creator_number = number;
        self
    }
}

#[derive(Debug, Clone)]
pub struct NewParticipation {
    pub round_id: RoundId,
    pub player_id: PlayerId,
    pub selected_number: Option<GuessNumber>,
    pub joined_at: OffsetDateTime,
    /// Seat limit of the round at the time of the insert
    pub capacity: usize,
}

/// Optimistic update of the round row. Applies only when the stored
/// `lock_version` still equals `current_lock_version`.
#[derive(Debug, Clone)]
pub struct RoundUpdate {
    pub id: RoundId,
    pub current_lock_version: i32,
    pub state: Option<RoundState>,
    pub start_time: Option<OffsetDateTime>,
}

impl RoundUpdate {
    pub fn new(id: RoundId, current_lock_version: i32) -> Self {
        Self {
            id,
            current_lock_version,
            state: None,
            start_time: None,
        }
    }

    pub fn with_state(mut self, state: RoundState) -> Self {
        self.state = Some(state);
        self
    }

    /// Moves the countdown start; `end_time` follows from the stored span.
    pub fn with_start_time(mut self, start_time: OffsetDateTime) -> Self {
        self.start_time = Some(start_time);
        self
    }
}

#[async_trait]
pub trait RoundRegistry: Send + Sync {
    /// Insert a round in Waiting with `start_time = created_at` together with
    /// its creator's participation, as one write. Fails with
    /// `Conflict(AlreadyInLiveRound)` if the creator is live elsewhere and with
    /// `Validation(SpanOutOfRange)` if `end_time` is not representable; nothing
    /// is written in either case.
    async fn insert_round(&self, round: NewRound) -> Result<(Round, Participation), DomainError>;

    async fn find_round(&self, id: RoundId) -> Result<Option<Round>, DomainError>;

    /// Rounds in `state`, ordered by id.
    async fn list_by_state(&self, state: RoundState) -> Result<Vec<Round>, DomainError>;

    /// All rounds, newest `start_time` first (ties broken by id descending).
    async fn list_all(&self) -> Result<Vec<Round>, DomainError>;

    /// Fails with `Conflict(OptimisticLock)` on a version mismatch and
    /// `Conflict(InvalidState)` on a backwards state change.
    async fn update_round(&self, update: RoundUpdate) -> Result<Round, DomainError>;

    /// Atomically move `id` from `from` to `to`. Returns `false` when the round
    /// was not in `from`; nothing is written in that case.
    async fn compare_and_set_state(
        &self,
        id: RoundId,
        from: RoundState,
        to: RoundState,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError>;

    /// Assign the winning number of a Resolved round. A second assignment
    /// fails with `Conflict(InvalidState)`.
    async fn set_winning_number(
        &self,
        id: RoundId,
        number: GuessNumber,
    ) -> Result<Round, DomainError>;

    /// Append a non-creator participation. Enforces one live participation
    /// per player across all rounds (`Conflict(AlreadyInLiveRound)`) and the
    /// seat limit (`Conflict(RoundFull)`).
    async fn insert_participation(
        &self,
        participation: NewParticipation,
    ) -> Result<Participation, DomainError>;

    async fn find_participation(
        &self,
        round_id: RoundId,
        player_id: PlayerId,
    ) -> Result<Option<Participation>, DomainError>;

    /// The player's participation in a Waiting or Active round, if any.
    async fn find_live_participation(
        &self,
        player_id: PlayerId,
    ) -> Result<Option<Participation>, DomainError>;

    /// Participations of a round in join order.
    async fn participations_for_round(
        &self,
        round_id: RoundId,
    ) -> Result<Vec<Participation>, DomainError>;

    async fn count_participations(&self, round_id: RoundId) -> Result<usize, DomainError>;

    /// Overwrite `selected_number` and `is_winner` of an existing row.
    async fn update_participation(
        &self,
        participation: &Participation,
    ) -> Result<Participation, DomainError>;

    /// Returns `false` when no such participation exists.
    async fn remove_participation(
        &self,
        round_id: RoundId,
        player_id: PlayerId,
    ) -> Result<bool, DomainError>;

    /// Per UTC day of `start_time`: round count and participant total,
    /// newest day first.
    async fn daily_round_stats(&self) -> Result<Vec<DailyRoundStats>, DomainError>;
}
