use std::sync::Arc;

use crate::adapters::{InMemoryPlayerStore, InMemoryRoundRegistry};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, RoundConfig};
use crate::repos::{PlayerStatsStore, RoundRegistry};
use crate::services::{
    NumberDraw, RandomDraw, RoundCoordinator, RoundScheduler, SeededDraw, WinnerResolver,
};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: RoundConfig,
    clock: Option<Arc<dyn Clock>>,
    draw: Option<Arc<dyn NumberDraw>>,
    registry: Option<Arc<dyn RoundRegistry>>,
    players: Option<Arc<dyn PlayerStatsStore>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: RoundConfig::default(),
            clock: None,
            draw: None,
            registry: None,
            players: None,
        }
    }

    pub fn with_config(mut self, config: RoundConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Overrides the draw chosen from `RoundConfig::draw_seed`.
    pub fn with_draw(mut self, draw: Arc<dyn NumberDraw>) -> Self {
        self.draw = Some(draw);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn RoundRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_player_store(mut self, players: Arc<dyn PlayerStatsStore>) -> Self {
        self.players = Some(players);
        self
    }

    pub fn build(self) -> Result<AppState, ConfigError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(InMemoryRoundRegistry::new()));
        let players = self
            .players
            .unwrap_or_else(|| Arc::new(InMemoryPlayerStore::new()));
        let draw = self.draw.unwrap_or_else(|| match self.config.draw_seed {
            Some(seed) => Arc::new(SeededDraw::new(seed)),
            None => Arc::new(RandomDraw),
        });

        let coordinator = Arc::new(RoundCoordinator::new(
            Arc::clone(&registry),
            Arc::clone(&players),
            Arc::clone(&clock),
            self.config.clone(),
        ));
        let resolver = Arc::new(WinnerResolver::new(
            Arc::clone(&registry),
            Arc::clone(&players),
            draw,
        ));
        let scheduler = Arc::new(RoundScheduler::new(
            Arc::clone(&coordinator),
            Arc::clone(&resolver),
            Arc::clone(&clock),
        ));

        Ok(AppState {
            config: self.config,
            clock,
            registry,
            players,
            coordinator,
            resolver,
            scheduler,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
