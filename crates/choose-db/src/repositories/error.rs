//! Error handling utilities for repositories

use choose_core::error::DomainError;
use choose_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation to a domain error chosen by the violated constraint
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

pub fn account_not_found(id: Snowflake) -> DomainError {
    DomainError::AccountNotFound(id)
}

pub fn poll_not_found(key: impl ToString) -> DomainError {
    DomainError::PollNotFound(key.to_string())
}

pub fn option_not_found(id: Snowflake) -> DomainError {
    DomainError::OptionNotFound(id)
}
