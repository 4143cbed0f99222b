//! Scheduler host. It wires the in-memory stores and runs the tick loop until
//! ctrl-c. Rounds are created through `RoundCoordinator` by the request layer
//! that embeds this crate; this binary exposes no request surface of its own.

use numdraw_backend::config::RoundConfig;
use numdraw_backend::infra::state::build_state;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod telemetry;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    // Round settings come from ROUND_* variables; see config::rounds
    let config = match RoundConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid round configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state().with_config(config).build() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(
        span_secs = app_state.config.span.whole_seconds(),
        capacity = app_state.config.capacity,
        seeded_draw = app_state.config.draw_seed.is_some(),
        "Starting numdraw round scheduler"
    );

    let shutdown = CancellationToken::new();
    let scheduler = app_state.scheduler().spawn(shutdown.clone());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    shutdown.cancel();

    if let Err(e) = scheduler.await {
        error!(error = %e, "Scheduler task ended abnormally");
        std::process::exit(1);
    }
}
