//! Runtime configuration loaded from the environment.

pub mod rounds;

use thiserror::Error;

use crate::errors::ErrorCode;

pub use rounds::{ActivationPolicy, RoundConfig, SelectionWindow, StartClock};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(var: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::ConfigError
    }
}
