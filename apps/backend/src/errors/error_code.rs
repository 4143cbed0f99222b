//! Error codes for the round lifecycle core.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings a request
//! layer puts on the wire.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Guess outside the drawable domain
    NumberOutOfRange,
    /// Non-positive result limit
    InvalidLimit,
    /// Round span too long for the timestamp range
    SpanOutOfRange,
    /// General validation error
    ValidationError,

    // Resource Not Found
    RoundNotFound,
    ParticipationNotFound,
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Player is already live in another round
    AlreadyInLiveRound,
    /// Round reached capacity
    RoundFull,
    /// Round state forbids the mutation
    InvalidRoundState,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Username already registered
    UniqueUsername,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    StorageUnavailable,
    DataCorruption,
    /// Internal error (explicit problem code)
    InternalError,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NumberOutOfRange => "NUMBER_OUT_OF_RANGE",
            Self::InvalidLimit => "INVALID_LIMIT",
            Self::SpanOutOfRange => "SPAN_OUT_OF_RANGE",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::ParticipationNotFound => "PARTICIPATION_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::AlreadyInLiveRound => "ALREADY_IN_LIVE_ROUND",
            Self::RoundFull => "ROUND_FULL",
            Self::InvalidRoundState => "INVALID_ROUND_STATE",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::UniqueUsername => "UNIQUE_USERNAME",
            Self::Conflict => "CONFLICT",

            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
