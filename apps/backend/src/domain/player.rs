//! Player identity and cumulative record, owned by the stats store.

use serde::Serialize;

use super::round::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub wins: u32,
    pub losses: u32,
}

impl Player {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Order players by wins descending. The sort is stable, so players with equal
/// wins keep the order they came in.
pub fn rank_by_wins(players: &mut [Player]) {
    players.sort_by(|a, b| b.wins.cmp(&a.wins));
}
