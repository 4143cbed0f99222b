//! Shared helpers for numdraw test binaries.
//!
//! Both the library's unit tests and the integration test binaries pull
//! logging setup and unique fixture names from here so every binary behaves
//! the same way under `cargo test`.

pub mod logging;
pub mod unique_helpers;
