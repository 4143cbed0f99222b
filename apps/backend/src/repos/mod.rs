//! Storage-collaborator contracts consumed by the services.
//!
//! The services depend only on these traits. `crate::adapters` holds the
//! in-memory reference implementations.

pub mod players;
pub mod rounds;

pub use players::PlayerStatsStore;
pub use rounds::{NewParticipation, NewRound, RoundRegistry, RoundUpdate};
