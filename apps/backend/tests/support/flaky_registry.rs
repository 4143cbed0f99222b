//! Registry wrapper that injects storage failures and stalls for chosen calls.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use numdraw_backend::adapters::InMemoryRoundRegistry;
use numdraw_backend::domain::{
    DailyRoundStats, GuessNumber, Participation, PlayerId, Round, RoundId, RoundState,
};
use numdraw_backend::errors::domain::{DomainError, InfraErrorKind};
use numdraw_backend::repos::{NewParticipation, NewRound, RoundRegistry, RoundUpdate};
use parking_lot::Mutex;
use time::OffsetDateTime;
use tokio::sync::Notify;

#[derive(Default)]
pub struct FlakyRegistry {
    inner: InMemoryRoundRegistry,
    failing_close: Mutex<HashSet<RoundId>>,
    failing_draw: Mutex<HashSet<RoundId>>,
    fail_insert: AtomicBool,
    stall_listing: AtomicBool,
    stall_insert: AtomicBool,
    stalled: Arc<Notify>,
    release: Arc<Notify>,
}

impl FlakyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `compare_and_set_state` into Resolved fails for `round_id` until healed.
    pub fn fail_close(&self, round_id: RoundId) {
        self.failing_close.lock().insert(round_id);
    }

    pub fn heal_close(&self, round_id: RoundId) {
        self.failing_close.lock().remove(&round_id);
    }

    /// `set_winning_number` fails for `round_id`.
    pub fn fail_draw(&self, round_id: RoundId) {
        self.failing_draw.lock().insert(round_id);
    }

    /// The next `insert_round` fails before writing anything.
    pub fn fail_next_insert(&self) {
        self.fail_insert.store(true, Ordering::SeqCst);
    }

    /// The next `list_by_state` call parks until [`Self::release`].
    pub fn stall_next_listing(&self) {
        self.stall_listing.store(true, Ordering::SeqCst);
    }

    /// The next `insert_round` parks after its write, before returning,
    /// until [`Self::release`].
    pub fn stall_next_insert(&self) {
        self.stall_insert.store(true, Ordering::SeqCst);
    }

    pub async fn wait_until_stalled(&self) {
        self.stalled.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn park(&self) {
        self.stalled.notify_one();
        self.release.notified().await;
    }

    fn unavailable(op: &str, round_id: RoundId) -> DomainError {
        DomainError::infra(
            InfraErrorKind::StorageUnavailable,
            format!("{op} for round {round_id} failed: injected outage"),
        )
    }
}

#[async_trait]
impl RoundRegistry for FlakyRegistry {
    async fn insert_round(&self, round: NewRound) -> Result<(Round, Participation), DomainError> {
        if self.fail_insert.swap(false, Ordering::SeqCst) {
            return Err(DomainError::infra(
                InfraErrorKind::StorageUnavailable,
                "insert_round failed: injected outage",
            ));
        }
        let inserted = self.inner.insert_round(round).await?;
        if self.stall_insert.swap(false, Ordering::SeqCst) {
            self.park().await;
        }
        Ok(inserted)
    }

    async fn find_round(&self, id: RoundId) -> Result<Option<Round>, DomainError> {
        self.inner.find_round(id).await
    }

    async fn list_by_state(&self, state: RoundState) -> Result<Vec<Round>, DomainError> {
        if self.stall_listing.swap(false, Ordering::SeqCst) {
            self.park().await;
        }
        self.inner.list_by_state(state).await
    }

    async fn list_all(&self) -> Result<Vec<Round>, DomainError> {
        self.inner.list_all().await
    }

    async fn update_round(&self, update: RoundUpdate) -> Result<Round, DomainError> {
        self.inner.update_round(update).await
    }

    async fn compare_and_set_state(
        &self,
        id: RoundId,
        from: RoundState,
        to: RoundState,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        let failing = self.failing_close.lock().contains(&id);
        if failing && to == RoundState::Resolved {
            return Err(Self::unavailable("compare_and_set_state", id));
        }
        self.inner.compare_and_set_state(id, from, to, at).await
    }

    async fn set_winning_number(
        &self,
        id: RoundId,
        number: GuessNumber,
    ) -> Result<Round, DomainError> {
        let failing = self.failing_draw.lock().contains(&id);
        if failing {
            return Err(Self::unavailable("set_winning_number", id));
        }
        self.inner.set_winning_number(id, number).await
    }

    async fn insert_participation(
        &self,
        participation: NewParticipation,
    ) -> Result<Participation, DomainError> {
        self.inner.insert_participation(participation).await
    }

    async fn find_participation(
        &self,
        round_id: RoundId,
        player_id: PlayerId,
    ) -> Result<Option<Participation>, DomainError> {
        self.inner.find_participation(round_id, player_id).await
    }

    async fn find_live_participation(
        &self,
        player_id: PlayerId,
    ) -> Result<Option<Participation>, DomainError> {
        self.inner.find_live_participation(player_id).await
    }

    async fn participations_for_round(
        &self,
        round_id: RoundId,
    ) -> Result<Vec<Participation>, DomainError> {
        self.inner.participations_for_round(round_id).await
    }

    async fn count_participations(&self, round_id: RoundId) -> Result<usize, DomainError> {
        self.inner.count_participations(round_id).await
    }

    async fn update_participation(
        &self,
        participation: &Participation,
    ) -> Result<Participation, DomainError> {
        self.inner.update_participation(participation).await
    }

    async fn remove_participation(
        &self,
        round_id: RoundId,
        player_id: PlayerId,
    ) -> Result<bool, DomainError> {
        self.inner.remove_participation(round_id, player_id).await
    }

    async fn daily_round_stats(&self) -> Result<Vec<DailyRoundStats>, DomainError> {
        self.inner.daily_round_stats().await
    }
}
