//! Domain-level error type used across services and adapters.
//!
//! This error type is transport- and storage-agnostic. A request layer maps it
//! onto its own responses through [`DomainError::code`].

use thiserror::Error;

use super::error_code::ErrorCode;

/// Input validation kinds (surfaced to callers as invalid input)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    NumberOutOfRange,
    InvalidLimit,
    /// Round span pushes `end_time` past the representable range
    SpanOutOfRange,
    Other(String),
}

/// Semantic conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Player already holds a participation in a Waiting or Active round
    AlreadyInLiveRound,
    /// Round reached its configured capacity
    RoundFull,
    /// Round is not in a state that allows the requested mutation
    InvalidState,
    /// Stored row changed since it was read
    OptimisticLock,
    UniqueUsername,
    Other(String),
}

/// Missing resources in domain terms
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Round,
    Participation,
    Player,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    StorageUnavailable,
    DataCorruption,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Out-of-range or missing input
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    /// Semantic conflict
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    /// Missing resource
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    /// Storage or other operational failure
    #[error("infra {0:?}: {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// Stable code for this error. Unmatched `Other` kinds fall back to the
    /// generic code of their category.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::NumberOutOfRange => ErrorCode::NumberOutOfRange,
                ValidationKind::InvalidLimit => ErrorCode::InvalidLimit,
                ValidationKind::SpanOutOfRange => ErrorCode::SpanOutOfRange,
                ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::AlreadyInLiveRound => ErrorCode::AlreadyInLiveRound,
                ConflictKind::RoundFull => ErrorCode::RoundFull,
                ConflictKind::InvalidState => ErrorCode::InvalidRoundState,
                ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                ConflictKind::UniqueUsername => ErrorCode::UniqueUsername,
                ConflictKind::Other(_) => ErrorCode::Conflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Round => ErrorCode::RoundNotFound,
                NotFoundKind::Participation => ErrorCode::ParticipationNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
                NotFoundKind::Other(_) => ErrorCode::NotFound,
            },
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::StorageUnavailable => ErrorCode::StorageUnavailable,
                InfraErrorKind::DataCorruption => ErrorCode::DataCorruption,
                InfraErrorKind::Other(_) => ErrorCode::InternalError,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(..))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict(..))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(..))
    }
}
