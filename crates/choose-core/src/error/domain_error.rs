//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(Snowflake),

    #[error("Poll not found: {0}")]
    PollNotFound(String),

    #[error("Option not found: {0}")]
    OptionNotFound(Snowflake),

    #[error("Media not found: {0}")]
    MediaNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("{0}")]
    ValidationError(String),

    #[error("Enter a valid email address.")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Places should be even number")]
    InvalidPlacesNumber,

    #[error("Number of options should be equal to number of places")]
    OptionCountMismatch,

    #[error("Number of options should be equal to number of places")]
    PollCapacityReached,

    #[error("Title \"{0}\" does not produce a usable slug")]
    InvalidSlug(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Authentication credentials were not provided")]
    AuthenticationRequired,

    #[error("Not poll creator")]
    NotPollCreator,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User with this email already exists.")]
    EmailAlreadyExists,

    #[error("A user with that username already exists.")]
    UsernameAlreadyExists,

    #[error("Poll with this title already exists.")]
    PollTitleExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) => "UNKNOWN_ACCOUNT",
            Self::PollNotFound(_) => "UNKNOWN_POLL",
            Self::OptionNotFound(_) => "UNKNOWN_OPTION",
            Self::MediaNotFound(_) => "UNKNOWN_MEDIA",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidPlacesNumber => "INVALID_PLACES_NUMBER",
            Self::OptionCountMismatch => "OPTION_COUNT_MISMATCH",
            Self::PollCapacityReached => "POLL_CAPACITY_REACHED",
            Self::InvalidSlug(_) => "INVALID_SLUG",

            // Authorization
            Self::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            Self::NotPollCreator => "NOT_POLL_CREATOR",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            Self::PollTitleExists => "POLL_TITLE_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Field the error belongs to, when it is tied to one request field
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidEmail | Self::EmailAlreadyExists => Some("email"),
            Self::InvalidUsername(_) | Self::UsernameAlreadyExists => Some("username"),
            Self::WeakPassword(_) => Some("password"),
            Self::InvalidPlacesNumber => Some("places_number"),
            Self::InvalidSlug(_) | Self::PollTitleExists => Some("title"),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::PollNotFound(_)
                | Self::OptionNotFound(_)
                | Self::MediaNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::InvalidPlacesNumber
                | Self::OptionCountMismatch
                | Self::PollCapacityReached
                | Self::InvalidSlug(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AuthenticationRequired | Self::NotPollCreator)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::UsernameAlreadyExists | Self::PollTitleExists
        )
    }
}
