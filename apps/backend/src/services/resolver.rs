//! Winner resolution for a round that has just moved to Resolved.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info};

use super::draw::NumberDraw;
use crate::domain::{GuessNumber, Participation, RoundId, RoundState};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::{PlayerStatsStore, RoundRegistry};

/// Draws the winning number, flags winners and updates every participant's
/// record.
///
/// Not re-entrant by itself: callers must run it at most once per round,
/// which `RoundCoordinator::close_expired` guarantees.
pub struct WinnerResolver {
    registry: Arc<dyn RoundRegistry>,
    players: Arc<dyn PlayerStatsStore>,
    draw: Arc<dyn NumberDraw>,
}

impl WinnerResolver {
    pub fn new(
        registry: Arc<dyn RoundRegistry>,
        players: Arc<dyn PlayerStatsStore>,
        draw: Arc<dyn NumberDraw>,
    ) -> Self {
        Self {
            registry,
            players,
            draw,
        }
    }

    /// Returns the winning participations in join order.
    pub async fn resolve(
        &self,
        round_id: RoundId,
        now: OffsetDateTime,
    ) -> Result<Vec<Participation>, DomainError> {
        let round = self
            .registry
            .find_round(round_id)
            .await?
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Round, format!("round {round_id}")))?;
        if round.state != RoundState::Resolved {
            return Err(DomainError::conflict(
                ConflictKind::InvalidState,
                format!(
                    "round {round_id} is {}; only resolved rounds get a draw",
                    round.state.as_str()
                ),
            ));
        }

        let winning = self.draw.draw(round_id);
        self.registry.set_winning_number(round_id, winning).await?;

        let participants = self.registry.participations_for_round(round_id).await?;
        let mut winners = Vec::new();
        for mut participation in participants {
            if participation.matches(winning) {
                participation.is_winner = true;
                let participation = self.registry.update_participation(&participation).await?;
                self.players.increment_wins(participation.player_id).await?;
                winners.push(participation);
            } else {
                self.players
                    .increment_losses(participation.player_id)
                    .await?;
                debug!(
                    round_id,
                    player_id = participation.player_id,
                    selected = ?participation.selected_number.map(GuessNumber::get),
                    "Participant lost"
                );
            }
        }

        info!(
            round_id,
            winning_number = winning.get(),
            winners = winners.len(),
            resolved_at = %now,
            "Round resolved"
        );
        Ok(winners)
    }
}
