//! Player stats store contract.

use async_trait::async_trait;

use crate::domain::{Player, PlayerId};
use crate::errors::domain::DomainError;

/// Owner of player identity and cumulative win/loss counters.
#[async_trait]
pub trait PlayerStatsStore: Send + Sync {
    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, DomainError>;

    /// Fails with `NotFound(Player)` for unknown ids.
    async fn increment_wins(&self, id: PlayerId) -> Result<Player, DomainError>;

    /// Fails with `NotFound(Player)` for unknown ids.
    async fn increment_losses(&self, id: PlayerId) -> Result<Player, DomainError>;

    /// At most `limit` players, wins descending, ties in registration order.
    async fn top_players(&self, limit: usize) -> Result<Vec<Player>, DomainError>;
}
