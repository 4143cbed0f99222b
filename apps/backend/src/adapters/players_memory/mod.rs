//! In-memory adapter for the player stats store.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{rank_by_wins, Player, PlayerId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::players::PlayerStatsStore;

/// Players kept in registration order, which is also the tie-break order of
/// the leaderboard.
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    players: RwLock<Vec<Player>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a player with zeroed counters. Usernames are unique.
    pub fn register(&self, username: impl Into<String>) -> Result<Player, DomainError> {
        let username = username.into();
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::Other("EMPTY_USERNAME".into()),
                "username must not be empty",
            ));
        }

        let mut players = self.players.write();
        if players.iter().any(|p| p.username == trimmed) {
            return Err(DomainError::conflict(
                ConflictKind::UniqueUsername,
                format!("username {trimmed} is taken"),
            ));
        }

        let player = Player {
            id: players.len() as PlayerId + 1,
            username: trimmed.to_string(),
            wins: 0,
            losses: 0,
        };
        players.push(player.clone());
        debug!(player_id = player.id, username = %player.username, "player registered");
        Ok(player)
    }

    fn update<F>(&self, id: PlayerId, apply: F) -> Result<Player, DomainError>
    where
        F: FnOnce(&mut Player),
    {
        let mut players = self.players.write();
        let player = players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("player {id}")))?;
        apply(player);
        Ok(player.clone())
    }
}

#[async_trait]
impl PlayerStatsStore for InMemoryPlayerStore {
    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        Ok(self.players.read().iter().find(|p| p.id == id).cloned())
    }

    async fn increment_wins(&self, id: PlayerId) -> Result<Player, DomainError> {
        self.update(id, |p| p.wins += 1)
    }

    async fn increment_losses(&self, id: PlayerId) -> Result<Player, DomainError> {
        self.update(id, |p| p.losses += 1)
    }

    async fn top_players(&self, limit: usize) -> Result<Vec<Player>, DomainError> {
        let mut ranked = self.players.read().clone();
        rank_by_wins(&mut ranked);
        ranked.truncate(limit);
        Ok(ranked)
    }
}
