//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`ExistingKey`] thrown when a unique value (username, email, ...) is
//!   already taken.
//! - [`Forbidden`] thrown when the caller does not own the item it mutates.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Forbidden`]: EngineError::Forbidden
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("{0}")]
    InvalidState(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Turn a unique constraint violation into [`EngineError::ExistingKey`].
    ///
    /// `detail` is matched against the violated constraint text to pick the
    /// message, falling back to `fallback`.
    pub(crate) fn from_unique_violation(
        err: DbErr,
        detail: &[(&str, &str)],
        fallback: &str,
    ) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(text)) => {
                let message = detail
                    .iter()
                    .find(|(column, _)| text.contains(column))
                    .map_or(fallback, |(_, message)| message);
                EngineError::ExistingKey(message.to_string())
            }
            _ => EngineError::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
