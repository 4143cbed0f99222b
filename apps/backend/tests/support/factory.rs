use std::sync::Arc;

use numdraw_backend::adapters::{InMemoryPlayerStore, InMemoryRoundRegistry};
use numdraw_backend::clock::{Clock, ManualClock};
use numdraw_backend::config::RoundConfig;
use numdraw_backend::domain::{GuessNumber, Player, PlayerId, RoundId, RoundView};
use numdraw_backend::errors::domain::DomainError;
use numdraw_backend::infra::state::build_state;
use numdraw_backend::repos::{PlayerStatsStore, RoundRegistry};
use numdraw_backend::services::{
    FixedDraw, NumberDraw, RoundCoordinator, RoundScheduler, WinnerResolver,
};
use numdraw_backend::{AppState, TickReport};
use numdraw_test_support::unique_helpers::unique_username;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

/// Fixed start instant shared by all harnesses.
pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-01 12:00:00 UTC)
}

/// 300 s span and capacity 10, like production defaults.
pub fn test_config() -> RoundConfig {
    RoundConfig::default()
        .with_span(Duration::seconds(300))
        .with_capacity(10)
}

/// Wired state over in-memory stores with a hand-driven clock.
pub struct Harness {
    pub clock: ManualClock,
    pub players: Arc<InMemoryPlayerStore>,
    pub registry: Arc<dyn RoundRegistry>,
    pub state: AppState,
}

impl Harness {
    /// Draws are forced to 5 unless a test says otherwise.
    pub fn new(config: RoundConfig) -> Self {
        Self::with_fixed_draw(config, 5)
    }

    pub fn with_fixed_draw(config: RoundConfig, number: u8) -> Self {
        let draw = GuessNumber::new(number).expect("fixed draw must be in range");
        Self::build(
            config,
            Arc::new(FixedDraw(draw)),
            Arc::new(InMemoryRoundRegistry::new()),
        )
    }

    pub fn build(
        config: RoundConfig,
        draw: Arc<dyn NumberDraw>,
        registry: Arc<dyn RoundRegistry>,
    ) -> Self {
        let clock = ManualClock::new(t0());
        let players = Arc::new(InMemoryPlayerStore::new());
        let state = build_state()
            .with_config(config)
            .with_clock(Arc::new(clock.clone()) as Arc<dyn Clock>)
            .with_draw(draw)
            .with_registry(Arc::clone(&registry))
            .with_player_store(players.clone() as Arc<dyn PlayerStatsStore>)
            .build()
            .expect("test config must be valid");

        Self {
            clock,
            players,
            registry,
            state,
        }
    }

    pub fn coordinator(&self) -> &RoundCoordinator {
        self.state.coordinator()
    }

    pub fn scheduler(&self) -> &Arc<RoundScheduler> {
        self.state.scheduler()
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// Register a player with a unique username derived from `prefix`.
    pub fn register(&self, prefix: &str) -> PlayerId {
        self.players
            .register(unique_username(prefix))
            .expect("unique username registers")
            .id
    }

    pub fn register_many(&self, prefix: &str, count: usize) -> Vec<PlayerId> {
        (0..count)
            .map(|i| self.register(&format!("{prefix}{i}")))
            .collect()
    }

    pub async fn player(&self, id: PlayerId) -> Player {
        self.players
            .find_player(id)
            .await
            .expect("player lookup")
            .expect("player exists")
    }

    pub async fn round(&self, id: RoundId) -> RoundView {
        self.coordinator()
            .get_round_by_id(id)
            .await
            .expect("round exists")
    }

    /// Services over the same stores with their own lock table and tick gate,
    /// as a second process sharing the storage would have them.
    pub fn second_process(&self, draw: u8) -> (Arc<RoundCoordinator>, Arc<RoundScheduler>) {
        let draw = GuessNumber::new(draw).expect("fixed draw must be in range");
        let coordinator = Arc::new(RoundCoordinator::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.state.players),
            Arc::clone(&self.state.clock),
            self.state.config.clone(),
        ));
        let resolver = Arc::new(WinnerResolver::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.state.players),
            Arc::new(FixedDraw(draw)),
        ));
        let scheduler = Arc::new(RoundScheduler::new(
            Arc::clone(&coordinator),
            resolver,
            Arc::clone(&self.state.clock),
        ));
        (coordinator, scheduler)
    }

    /// Advance the clock by `by` and run one tick at the new instant.
    pub async fn advance_and_tick(&self, by: Duration) -> TickReport {
        let now = self.clock.advance(by);
        self.scheduler().tick(now).await
    }

    /// Create a round for a fresh creator and return (round id, creator id).
    pub async fn open_round(&self, creator_number: Option<u8>) -> Result<(RoundId, PlayerId), DomainError> {
        let creator = self.register("creator");
        let view = self.coordinator().create_round(creator, creator_number).await?;
        Ok((view.round.id, creator))
    }
}
