//! The guess domain shared by selections and draws.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::errors::domain::{DomainError, ValidationKind};

/// A number inside the drawable domain `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GuessNumber(u8);

impl GuessNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(
                ValidationKind::NumberOutOfRange,
                format!(
                    "number {value} outside {}..={}",
                    Self::MIN,
                    Self::MAX
                ),
            ))
        }
    }

    /// Validate an optional caller-supplied selection.
    pub fn from_optional(value: Option<u8>) -> Result<Option<Self>, DomainError> {
        value.map(Self::new).transpose()
    }

    /// Uniform sample over the whole domain.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(Self::MIN..=Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every member of the domain in ascending order.
    pub fn all() -> impl Iterator<Item = GuessNumber> {
        (Self::MIN..=Self::MAX).map(GuessNumber)
    }
}

impl TryFrom<u8> for GuessNumber {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GuessNumber> for u8 {
    fn from(n: GuessNumber) -> Self {
        n.0
    }
}

impl fmt::Display for GuessNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
