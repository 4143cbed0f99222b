//! Test logging initialization.
//!
//! One subscriber per test binary, installed on first call. Later calls are
//! no-ops, so `#[ctor]` hooks and individual tests may both call [`init`].

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Default directive used when neither `TEST_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_TEST_FILTER: &str = "warn";

/// Install the test subscriber with [`DEFAULT_TEST_FILTER`] as fallback.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then the default.
///
/// ```bash
/// TEST_LOG=numdraw_backend=debug cargo test --test services_tests
/// ```
pub fn init() {
    init_with_default(DEFAULT_TEST_FILTER);
}

/// Same as [`init`] but with a caller-provided fallback directive.
///
/// Only the first call in a process decides the filter.
pub fn init_with_default(default_directive: &str) {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init()
            .ok();
    });
}
