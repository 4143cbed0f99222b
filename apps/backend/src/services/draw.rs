//! Winning-number draw strategies.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::{derive_draw_seed, GuessNumber, RoundId};

/// Source of winning numbers. Implementations must only return members of
/// the `GuessNumber` domain.
pub trait NumberDraw: Send + Sync {
    fn draw(&self, round_id: RoundId) -> GuessNumber;
}

/// Uniform draw from the thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDraw;

impl NumberDraw for RandomDraw {
    fn draw(&self, _round_id: RoundId) -> GuessNumber {
        GuessNumber::sample(&mut rand::rng())
    }
}

/// Deterministic draw: the same base seed and round id always yield the same
/// number.
#[derive(Debug, Clone, Copy)]
pub struct SeededDraw {
    base_seed: u64,
}

impl SeededDraw {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }
}

impl NumberDraw for SeededDraw {
    fn draw(&self, round_id: RoundId) -> GuessNumber {
        let mut rng = ChaCha20Rng::seed_from_u64(derive_draw_seed(self.base_seed, round_id));
        GuessNumber::sample(&mut rng)
    }
}

/// Always draws the same number.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub GuessNumber);

impl NumberDraw for FixedDraw {
    fn draw(&self, _round_id: RoundId) -> GuessNumber {
        self.0
    }
}
