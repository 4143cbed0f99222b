//! In-memory adapter for the round registry.
//!
//! All rows sit behind a single `RwLock`, so every trait call is atomic with
//! respect to every other. Multi-call sequences still need the service-level
//! keyed locks.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use time::{Duration, OffsetDateTime};
use tracing::trace;

use crate::domain::{
    group_by_date, DailyRoundStats, GuessNumber, Participation, ParticipationId, PlayerId, Round,
    RoundId, RoundState,
};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::rounds::{NewParticipation, NewRound, RoundRegistry, RoundUpdate};

#[derive(Debug, Default)]
struct Tables {
    last_round_id: RoundId,
    last_participation_id: ParticipationId,
    rounds: BTreeMap<RoundId, Round>,
    /// Global insertion order; filtering by round keeps join order.
    participations: Vec<Participation>,
}

impl Tables {
    fn round(&self, id: RoundId) -> Result<&Round, DomainError> {
        self.rounds
            .get(&id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Round, format!("round {id}")))
    }

    fn round_mut(&mut self, id: RoundId) -> Result<&mut Round, DomainError> {
        self.rounds
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Round, format!("round {id}")))
    }

    fn is_live_round(&self, id: RoundId) -> bool {
        self.rounds.get(&id).is_some_and(|r| r.state.is_live())
    }

    fn live_participation(&self, player_id: PlayerId) -> Option<&Participation> {
        self.participations
            .iter()
            .find(|p| p.player_id == player_id && self.is_live_round(p.round_id))
    }

    /// Unique live participation per player
    fn ensure_not_live(&self, player_id: PlayerId) -> Result<(), DomainError> {
        match self.live_participation(player_id) {
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

    fn push_participation(
        &mut self,
        round_id: RoundId,
        player_id: PlayerId,
        selected_number: Option<GuessNumber>,
        is_creator: bool,
        joined_at: OffsetDateTime,
    ) -> Participation {
        self.last_participation_id += 1;
        let row = Participation {
            id: self.last_participation_id,
            round_id,
            player_id,
            selected_number,
            is_winner: false,
            is_creator,
            joined_at,
        };
        self.participations.push(row.clone());
        row
    }

    fn participant_count(&self, round_id: RoundId) -> usize {
        self.participations
            .iter()
            .filter(|p| p.round_id == round_id)
            .count()
    }
}

fn end_time_of(start: OffsetDateTime, span: Duration) -> Result<OffsetDateTime, DomainError> {
    start.checked_add(span).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::SpanOutOfRange,
            format!("span of {span} from {start} overflows"),
        )
    })
}

#[derive(Debug, Default)]
pub struct InMemoryRoundRegistry {
    tables: RwLock<Tables>,
}

impl InMemoryRoundRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoundRegistry for InMemoryRoundRegistry {
    async fn insert_round(&self, round: NewRound) -> Result<(Round, Participation), DomainError> {
        let end_time = end_time_of(round.created_at, round.span)?;

        let mut tables = self.tables.write();
        tables.ensure_not_live(round.creator_id)?;

        tables.last_round_id += 1;
        let row = Round {
            id: tables.last_round_id,
            created_at: round.created_at,
            start_time: round.created_at,
            end_time,
            span: round.span,
            winning_number: None,
            creator_id: round.creator_id,
            state: RoundState::Waiting,
            lock_version: 1,
            resolved_at: None,
        };
        tables.rounds.insert(row.id, row.clone());

        let creator = tables.push_participation(
            row.id,
            round.creator_id,
            round.creator_number,
            true,
            round.created_at,
        );
        trace!(round_id = row.id, creator_id = row.creator_id, "round row inserted");
        Ok((row, creator))
    }

    async fn find_round(&self, id: RoundId) -> Result<Option<Round>, DomainError> {
        Ok(self.tables.read().rounds.get(&id).cloned())
    }

    async fn list_by_state(&self, state: RoundState) -> Result<Vec<Round>, DomainError> {
        Ok(self
            .tables
            .read()
            .rounds
            .values()
            .filter(|r| r.state == state)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Round>, DomainError> {
        let mut rounds: Vec<Round> = self.tables.read().rounds.values().cloned().collect();
        rounds.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
        Ok(rounds)
    }

    async fn update_round(&self, update: RoundUpdate) -> Result<Round, DomainError> {
        let mut tables = self.tables.write();
        let round = tables.round_mut(update.id)?;

        if round.lock_version != update.current_lock_version {
            return Err(DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "round {} lock version mismatch: expected {}, actual {}",
                    update.id, update.current_lock_version, round.lock_version
                ),
            ));
        }

        let restart = match update.start_time {
            Some(start) => Some((start, end_time_of(start, round.span)?)),
            None => None,
        };

        if let Some(next) = update.state {
            if next != round.state && !round.state.can_advance_to(next) {
                return Err(DomainError::conflict(
                    ConflictKind::InvalidState,
                    format!(
                        "round {} cannot move from {} to {}",
                        update.id,
                        round.state.as_str(),
                        next.as_str()
                    ),
                ));
            }
            round.state = next;
        }

        if let Some((start, end)) = restart {
            round.start_time = start;
            round.end_time = end;
        }

        round.lock_version += 1;
        Ok(round.clone())
    }

    async fn compare_and_set_state(
        &self,
        id: RoundId,
        from: RoundState,
        to: RoundState,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        if !from.can_advance_to(to) {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!("{} -> {} is not a forward transition", from.as_str(), to.as_str()),
            ));
        }

        let mut tables = self.tables.write();
        let round = tables.round_mut(id)?;
        if round.state != from {
            return Ok(false);
        }

        round.state = to;
        round.lock_version += 1;
        if to == RoundState::Resolved {
            round.resolved_at = Some(at);
        }
        Ok(true)
    }

    async fn set_winning_number(
        &self,
        id: RoundId,
        number: GuessNumber,
    ) -> Result<Round, DomainError> {
        let mut tables = self.tables.write();
        let round = tables.round_mut(id)?;

        if round.state != RoundState::Resolved {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!("round {id} is {} and cannot take a winning number", round.state.as_str()),
            ));
        }
        if let Some(existing) = round.winning_number {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!("round {id} already has winning number {existing}"),
            ));
        }

        round.winning_number = Some(number);
        round.lock_version += 1;
        Ok(round.clone())
    }

    async fn insert_participation(
        &self,
        participation: NewParticipation,
    ) -> Result<Participation, DomainError> {
        let mut tables = self.tables.write();
        let round = tables.round(participation.round_id)?;
        if !round.state.is_live() {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!("round {} is resolved", participation.round_id),
            ));
        }

        tables.ensure_not_live(participation.player_id)?;

        let seated = tables.participant_count(participation.round_id);
        if seated >= participation.capacity {
            return Err(DomainError::conflict(
                ConflictKind::RoundFull,
                format!(
                    "round {} has {seated} of {} seats taken",
                    participation.round_id, participation.capacity
                ),
            ));
        }

        Ok(tables.push_participation(
            participation.round_id,
            participation.player_id,
            participation.selected_number,
            false,
            participation.joined_at,
        ))
    }

    async fn find_participation(
        &self,
        round_id: RoundId,
        player_id: PlayerId,
    ) -> Result<Option<Participation>, DomainError> {
        Ok(self
            .tables
            .read()
            .participations
            .iter()
            .find(|p| p.round_id == round_id && p.player_id == player_id)
            .cloned())
    }

    async fn find_live_participation(
        &self,
        player_id: PlayerId,
    ) -> Result<Option<Participation>, DomainError> {
        Ok(self.tables.read().live_participation(player_id).cloned())
    }

    async fn participations_for_round(
        &self,
        round_id: RoundId,
    ) -> Result<Vec<Participation>, DomainError> {
        Ok(self
            .tables
            .read()
            .participations
            .iter()
            .filter(|p| p.round_id == round_id)
            .cloned()
            .collect())
    }

    async fn count_participations(&self, round_id: RoundId) -> Result<usize, DomainError> {
        Ok(self.tables.read().participant_count(round_id))
    }

    async fn update_participation(
        &self,
        participation: &Participation,
    ) -> Result<Participation, DomainError> {
        let mut tables = self.tables.write();
        let row = tables
            .participations
            .iter_mut()
            .find(|p| p.id == participation.id)
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Participation,
                    format!("participation {}", participation.id),
                )
            })?;

        row.selected_number = participation.selected_number;
        row.is_winner = participation.is_winner;
        Ok(row.clone())
    }

    async fn remove_participation(
        &self,
        round_id: RoundId,
        player_id: PlayerId,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write();
        let before = tables.participations.len();
        tables
            .participations
            .retain(|p| !(p.round_id == round_id && p.player_id == player_id));
        Ok(tables.participations.len() != before)
    }

    async fn daily_round_stats(&self) -> Result<Vec<DailyRoundStats>, DomainError> {
        let tables = self.tables.read();
        let rows = tables
            .rounds
            .values()
            .map(|r| {
                let utc_day = r.start_time.to_offset(time::UtcOffset::UTC).date();
                (utc_day, tables.participant_count(r.id))
            });
        Ok(group_by_date(rows))
    }
}
