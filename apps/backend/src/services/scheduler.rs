//! Periodic driver that activates waiting rounds and resolves expired ones.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::resolver::WinnerResolver;
use super::rounds::RoundCoordinator;
use crate::clock::Clock;
use crate::config::ActivationPolicy;
use crate::domain::RoundId;

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The previous tick was still running; nothing was done.
    pub skipped: bool,
    /// Rounds promoted from Waiting to Active.
    pub activated: Vec<RoundId>,
    /// Rounds closed and resolved by this tick.
    pub resolved: Vec<RoundId>,
    /// Rounds whose activation, close or resolution failed.
    pub failed: Vec<RoundId>,
}

impl TickReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.skipped
            && self.activated.is_empty()
            && self.resolved.is_empty()
            && self.failed.is_empty()
    }
}

pub struct RoundScheduler {
    coordinator: Arc<RoundCoordinator>,
    resolver: Arc<WinnerResolver>,
    clock: Arc<dyn Clock>,
    tick_gate: Mutex<()>,
}

impl RoundScheduler {
    pub fn new(
        coordinator: Arc<RoundCoordinator>,
        resolver: Arc<WinnerResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            coordinator,
            resolver,
            clock,
            tick_gate: Mutex::new(()),
        }
    }

    /// Run one pass at `now`. Failures are per round: they are logged and
    /// reported, and the remaining rounds are still processed.
    pub async fn tick(&self, now: OffsetDateTime) -> TickReport {
        let Ok(_gate) = self.tick_gate.try_lock() else {
            debug!("Previous tick still running; skipping");
            return TickReport::skipped();
        };

        let mut report = TickReport::default();

        if self.coordinator.config().activation == ActivationPolicy::OnTick {
            self.activate_waiting(&mut report).await;
        }

        let active = match self.coordinator.list_active().await {
            Ok(rounds) => rounds,
            Err(err) => {
                error!(error = %err, "Listing active rounds failed");
                return report;
            }
        };

        for view in active {
            let round_id = view.round.id;
            if !view.round.is_expired_at(now) {
                continue;
            }

            match self.coordinator.close_expired(round_id, now).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    error!(round_id, error = %err, "Closing expired round failed");
                    report.failed.push(round_id);
                    continue;
                }
            }

            match self.resolver.resolve(round_id, now).await {
                Ok(_) => report.resolved.push(round_id),
                Err(err) => {
                    // The round stays Resolved; its draw and stats are incomplete
                    error!(round_id, error = %err, "Resolving closed round failed");
                    report.failed.push(round_id);
                }
            }
        }

        if !report.is_idle() {
            info!(
                activated = report.activated.len(),
                resolved = report.resolved.len(),
                failed = report.failed.len(),
                "Tick finished"
            );
        }
        report
    }

    async fn activate_waiting(&self, report: &mut TickReport) {
        let waiting = match self.coordinator.list_waiting().await {
            Ok(rounds) => rounds,
            Err(err) => {
                error!(error = %err, "Listing waiting rounds failed");
                return;
            }
        };

        for view in waiting {
            let round_id = view.round.id;
            match self.coordinator.activate_round(round_id).await {
                Ok(true) => report.activated.push(round_id),
                Ok(false) => {}
                Err(err) => {
                    error!(round_id, error = %err, "Activating waiting round failed");
                    report.failed.push(round_id);
                }
            }
        }
    }

    /// Tick every `tick_interval` until `shutdown` is cancelled. Missed ticks
    /// are skipped rather than bunched up.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let period = self.coordinator.config().tick_interval;
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let tick_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        info!(tick_ms, "Round scheduler started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let now = self.clock.now();
                    self.tick(now).await;
                }
            }
        }

        info!("Round scheduler stopped");
    }

    pub fn spawn(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run(shutdown))
    }
}
