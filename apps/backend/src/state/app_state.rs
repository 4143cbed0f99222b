use std::sync::Arc;

use crate::clock::Clock;
use crate::config::RoundConfig;
use crate::repos::{PlayerStatsStore, RoundRegistry};
use crate::services::{RoundCoordinator, RoundScheduler, WinnerResolver};

/// Application state containing the wired services and their collaborators
#[derive(Clone)]
pub struct AppState {
    pub config: RoundConfig,
    pub clock: Arc<dyn Clock>,
    pub registry: Arc<dyn RoundRegistry>,
    pub players: Arc<dyn PlayerStatsStore>,
    pub coordinator: Arc<RoundCoordinator>,
    pub resolver: Arc<WinnerResolver>,
    pub scheduler: Arc<RoundScheduler>,
}

impl AppState {
    pub fn coordinator(&self) -> &RoundCoordinator {
        &self.coordinator
    }

    pub fn scheduler(&self) -> &Arc<RoundScheduler> {
        &self.scheduler
    }
}
