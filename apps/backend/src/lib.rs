#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod repos;
pub mod services;
pub mod state;

// Re-exports for public API
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, RoundConfig};
pub use errors::domain::DomainError;
pub use errors::ErrorCode;
pub use infra::state::{build_state, StateBuilder};
pub use services::{RoundCoordinator, RoundScheduler, TickReport, WinnerResolver};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    numdraw_test_support::logging::init();
}
