//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidIdentifier`] thrown when a user or expense id is not a positive
//!   integer.
//! - [`InvalidPeriodKey`] thrown when a period key is not in `YYYY-MM` form.
//! - [`StoreTimeout`] and [`Database`] thrown when the store could not answer.
//!   Both are retryable and never mean "not found".
//!
//!  [`InvalidIdentifier`]: EngineError::InvalidIdentifier
//!  [`InvalidPeriodKey`]: EngineError::InvalidPeriodKey
//!  [`StoreTimeout`]: EngineError::StoreTimeout
//!  [`Database`]: EngineError::Database
use std::time::Duration;

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Invalid period key: {0}")]
    InvalidPeriodKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Store did not answer within {0:?}")]
    StoreTimeout(Duration),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` when the failure comes from the store and the same call
    /// may succeed later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreTimeout(_) | Self::Database(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidIdentifier(a), Self::InvalidIdentifier(b)) => a == b,
            (Self::InvalidPeriodKey(a), Self::InvalidPeriodKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidConfig(a), Self::InvalidConfig(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::StoreTimeout(a), Self::StoreTimeout(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_retryable() {
        assert!(EngineError::StoreTimeout(Duration::from_secs(1)).is_retryable());
        assert!(EngineError::Database(DbErr::Custom("down".to_string())).is_retryable());
    }

    #[test]
    fn caller_mistakes_are_not_retryable() {
        assert!(!EngineError::InvalidIdentifier("abc".to_string()).is_retryable());
        assert!(!EngineError::InvalidPeriodKey("2024-13".to_string()).is_retryable());
        assert!(!EngineError::KeyNotFound("user".to_string()).is_retryable());
        assert!(!EngineError::InvalidConfig("timeout".to_string()).is_retryable());
    }
}
