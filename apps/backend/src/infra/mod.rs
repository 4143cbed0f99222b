//! Infrastructure layer - state wiring.

pub mod state;
