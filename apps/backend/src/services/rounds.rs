//! Round lifecycle coordination: create, join, leave, select, start, queries.
//!
//! Every mutating operation takes its keyed locks in a fixed order (player
//! lock before round lock) and re-reads the round after locking, so checks and
//! writes see a stable round state. The registry's live-participation
//! constraint backs this up at the storage layer.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::locks::RoundLocks;
use crate::clock::Clock;
use crate::config::{RoundConfig, SelectionWindow, StartClock};
use crate::domain::{
    DailyRoundStats, GuessNumber, Participation, Player, PlayerId, Round, RoundId, RoundState,
    RoundView,
};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::{NewParticipation, NewRound, PlayerStatsStore, RoundRegistry, RoundUpdate};

pub struct RoundCoordinator {
    registry: Arc<dyn RoundRegistry>,
    players: Arc<dyn PlayerStatsStore>,
    clock: Arc<dyn Clock>,
    config: RoundConfig,
    locks: RoundLocks,
}

impl RoundCoordinator {
    pub fn new(
        registry: Arc<dyn RoundRegistry>,
        players: Arc<dyn PlayerStatsStore>,
        clock: Arc<dyn Clock>,
        config: RoundConfig,
    ) -> Self {
        Self {
            registry,
            players,
            clock,
            config,
            locks: RoundLocks::new(),
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Create a Waiting round and auto-join its creator as first participant.
    ///
    /// The registry writes the round and the creator's seat together, so no
    /// other caller ever sees the round without its creator.
    pub async fn create_round(
        &self,
        creator_id: PlayerId,
        initial_number: Option<u8>,
    ) -> Result<RoundView, DomainError> {
        let selected = GuessNumber::from_optional(initial_number)?;

        let _player_guard = self.locks.players.lock(creator_id).await;
        self.require_player(creator_id).await?;
        self.ensure_not_live(creator_id).await?;

        let now = self.clock.now();
        let (round, creator) = self
            .registry
            .insert_round(
                NewRound::new(creator_id, now, self.config.span).with_creator_number(selected),
            )
            .await?;

        info!(
            round_id = round.id,
            player_id = creator_id,
            end_time = %round.end_time,
            "Round created"
        );

        Ok(RoundView::at(round, vec![creator], now))
    }

    /// Join `round_id`. Number validation runs before any lookup; the rest of
    /// the checks run in order: round, player, round state, live membership,
    /// capacity.
    pub async fn join_round(
        &self,
        player_id: PlayerId,
        number: Option<u8>,
        round_id: RoundId,
    ) -> Result<Participation, DomainError> {
        let selected = GuessNumber::from_optional(number)?;

        let _player_guard = self.locks.players.lock(player_id).await;
        let _round_guard = self.locks.rounds.lock(round_id).await;

        let round = self.require_round(round_id).await?;
        self.require_player(player_id).await?;

        if round.state == RoundState::Resolved {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!("round {round_id} is resolved"),
            ));
        }

        self.ensure_not_live(player_id).await?;

        let count = self.registry.count_participations(round_id).await?;
        if count >= self.config.capacity {
            return Err(DomainError::conflict(
                ConflictKind::RoundFull,
                format!(
                    "round {round_id} has {count} of {} seats taken",
                    self.config.capacity
                ),
            ));
        }

        let participation = self
            .registry
            .insert_participation(NewParticipation {
                round_id,
                player_id,
                selected_number: selected,
                joined_at: self.clock.now(),
                capacity: self.config.capacity,
            })
            .await?;

        debug!(round_id, player_id, seat = count + 1, "Player joined round");
        Ok(participation)
    }

    /// Remove the player's participation from a round that is not Resolved.
    ///
    /// The round keeps its `creator_id` even when the creator leaves.
    pub async fn leave_round(
        &self,
        player_id: PlayerId,
        round_id: RoundId,
    ) -> Result<(), DomainError> {
        let _player_guard = self.locks.players.lock(player_id).await;
        let _round_guard = self.locks.rounds.lock(round_id).await;

        let round = self.require_round(round_id).await?;
        self.require_participation(round_id, player_id).await?;

        if round.state == RoundState::Resolved {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!("round {round_id} is resolved; participants are final"),
            ));
        }

        if !self
            .registry
            .remove_participation(round_id, player_id)
            .await?
        {
            return Err(participation_not_found(round_id, player_id));
        }

        debug!(round_id, player_id, "Player left round");
        Ok(())
    }

    /// Set or overwrite the player's number. Repeating a call is a no-op.
    pub async fn select_number(
        &self,
        player_id: PlayerId,
        round_id: RoundId,
        number: u8,
    ) -> Result<Participation, DomainError> {
        let selected = GuessNumber::new(number)?;

        let _round_guard = self.locks.rounds.lock(round_id).await;

        let round = self.require_round(round_id).await?;
        let mut participation = self.require_participation(round_id, player_id).await?;

        let open = match self.config.selection_window {
            SelectionWindow::WaitingOnly => round.state == RoundState::Waiting,
            SelectionWindow::UntilResolved => round.state.is_live(),
        };
        if !open {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!(
                    "round {round_id} is {}; selections are closed",
                    round.state.as_str()
                ),
            ));
        }

        if participation.selected_number == Some(selected) {
            return Ok(participation);
        }

        participation.selected_number = Some(selected);
        let updated = self.registry.update_participation(&participation).await?;

        debug!(round_id, player_id, number, "Number selected");
        Ok(updated)
    }

    /// Explicit Waiting -> Active. With `StartClock::ResetOnStart` the
    /// countdown restarts now.
    pub async fn start_round(&self, round_id: RoundId) -> Result<Round, DomainError> {
        let _round_guard = self.locks.rounds.lock(round_id).await;

        let round = self.require_round(round_id).await?;
        if round.state != RoundState::Waiting {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!(
                    "round {round_id} is {}; only waiting rounds can start",
                    round.state.as_str()
                ),
            ));
        }

        let mut update =
            RoundUpdate::new(round_id, round.lock_version).with_state(RoundState::Active);
        if self.config.start_clock == StartClock::ResetOnStart {
            update = update.with_start_time(self.clock.now());
        }
        let started = self.registry.update_round(update).await?;

        info!(
            round_id,
            start_time = %started.start_time,
            end_time = %started.end_time,
            "Round started"
        );
        Ok(started)
    }

    /// Promote a Waiting round to Active without touching its countdown.
    /// Returns `false` if the round already left Waiting, including when
    /// another scheduler promoted it first.
    pub async fn activate_round(&self, round_id: RoundId) -> Result<bool, DomainError> {
        let _round_guard = self.locks.rounds.lock(round_id).await;

        let round = self.require_round(round_id).await?;
        if round.state != RoundState::Waiting {
            return Ok(false);
        }

        let now = self.clock.now();
        let activated = self
            .registry
            .compare_and_set_state(round_id, RoundState::Waiting, RoundState::Active, now)
            .await?;
        if activated {
            info!(round_id, "Round activated");
        }
        Ok(activated)
    }

    /// Move an expired Active round to Resolved.
    ///
    /// Holds the round lock across the check and the compare-and-set, so it
    /// serializes with joins and leaves. Once this returns `true` every later
    /// mutation observes Resolved. Returns `false` when the round is not
    /// Active, not yet expired, or another caller won the transition.
    pub async fn close_expired(
        &self,
        round_id: RoundId,
        now: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        let _round_guard = self.locks.rounds.lock(round_id).await;

        let round = self.require_round(round_id).await?;
        if round.state != RoundState::Active || !round.is_expired_at(now) {
            return Ok(false);
        }

        let closed = self
            .registry
            .compare_and_set_state(round_id, RoundState::Active, RoundState::Resolved, now)
            .await?;
        if closed {
            info!(round_id, resolved_at = %now, "Round closed");
        } else {
            warn!(round_id, "Lost resolve transition; round is no longer active");
        }
        Ok(closed)
    }

    pub async fn get_round_by_id(&self, round_id: RoundId) -> Result<RoundView, DomainError> {
        let round = self.require_round(round_id).await?;
        self.view(round).await
    }

    pub async fn list_active(&self) -> Result<Vec<RoundView>, DomainError> {
        self.list_state(RoundState::Active).await
    }

    pub async fn list_waiting(&self) -> Result<Vec<RoundView>, DomainError> {
        self.list_state(RoundState::Waiting).await
    }

    /// Every round, newest `start_time` first.
    pub async fn list_all(&self) -> Result<Vec<RoundView>, DomainError> {
        let rounds = self.registry.list_all().await?;
        self.views(rounds).await
    }

    /// Leaderboard: wins descending, ties in registration order.
    pub async fn top_players(&self, limit: usize) -> Result<Vec<Player>, DomainError> {
        if limit == 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidLimit,
                "limit must be at least 1",
            ));
        }
        self.players.top_players(limit).await
    }

    pub async fn sessions_grouped_by_date(&self) -> Result<Vec<DailyRoundStats>, DomainError> {
        self.registry.daily_round_stats().await
    }

    async fn list_state(&self, state: RoundState) -> Result<Vec<RoundView>, DomainError> {
        let rounds = self.registry.list_by_state(state).await?;
        self.views(rounds).await
    }

    async fn views(&self, rounds: Vec<Round>) -> Result<Vec<RoundView>, DomainError> {
        let mut views = Vec::with_capacity(rounds.len());
        for round in rounds {
            views.push(self.view(round).await?);
        }
        Ok(views)
    }

    async fn view(&self, round: Round) -> Result<RoundView, DomainError> {
        let participants = self.registry.participations_for_round(round.id).await?;
        Ok(RoundView::at(round, participants, self.clock.now()))
    }

    async fn require_round(&self, round_id: RoundId) -> Result<Round, DomainError> {
        self.registry
            .find_round(round_id)
            .await?
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Round, format!("round {round_id}")))
    }

    async fn require_player(&self, player_id: PlayerId) -> Result<Player, DomainError> {
        self.players.find_player(player_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("player {player_id}"))
        })
    }

    async fn require_participation(
        &self,
        round_id: RoundId,
        player_id: PlayerId,
    ) -> Result<Participation, DomainError> {
        self.registry
            .find_participation(round_id, player_id)
            .await?
            .ok_or_else(|| participation_not_found(round_id, player_id))
    }

    async fn ensure_not_live(&self, player_id: PlayerId) -> Result<(), DomainError> {
        match self.registry.find_live_participation(player_id).await? {
            Some(existing) => Err(DomainError::conflict(
                ConflictKind::AlreadyInLiveRound,
                format!(
                    "player {player_id} is already in live round {}",
                    existing.round_id
                ),
            )),
            None => Ok(()),
        }
    }
}

fn participation_not_found(round_id: RoundId, player_id: PlayerId) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Participation,
        format!("player {player_id} in round {round_id}"),
    )
}
