//! Domain layer: pure round lifecycle types and helpers.

pub mod number;
pub mod player;
pub mod round;
pub mod seed_derivation;
pub mod stats;

// Re-exports for ergonomics
pub use number::GuessNumber;
pub use player::{rank_by_wins, Player};
pub use round::{
    ParticipationId, Participation, PlayerId, Round, RoundId, RoundState, RoundView,
};
pub use seed_derivation::derive_draw_seed;
pub use stats::{group_by_date, DailyRoundStats};
