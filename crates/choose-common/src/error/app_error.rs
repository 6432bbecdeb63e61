//! Errors raised by the infrastructure helpers: tokens, config, pool, mail

use choose_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    /// Bad signature, wrong purpose or malformed
    #[error("Token is invalid or expired")]
    InvalidToken,

    #[error("Token is invalid or expired")]
    TokenExpired,

    /// Input rejected outside any single field
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired => 401,
            Self::Validation(_) => 400,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => 500,
            Self::Domain(e) => domain_status(e),
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// HTTP status for a domain error.
///
/// A non-creator touching a poll gets the same 404 as a missing poll.
pub fn domain_status(err: &DomainError) -> u16 {
    if err.is_not_found() || matches!(err, DomainError::NotPollCreator) {
        404
    } else if matches!(err, DomainError::AuthenticationRequired) {
        401
    } else if err.is_validation() || err.is_conflict() {
        400
    } else {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choose_core::Snowflake;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidCredentials.status_code(), 401);
        assert_eq!(AppError::TokenExpired.status_code(), 401);
        assert_eq!(AppError::Validation("x".to_string()).status_code(), 400);
        assert_eq!(AppError::Database("down".to_string()).status_code(), 500);
        assert_eq!(
            AppError::internal(std::io::Error::other("boom")).status_code(),
            500
        );
    }

    #[test]
    fn test_domain_status_codes() {
        let status = |e: DomainError| AppError::Domain(e).status_code();
        assert_eq!(status(DomainError::PollNotFound("x".into())), 404);
        assert_eq!(status(DomainError::NotPollCreator), 404);
        assert_eq!(status(DomainError::AuthenticationRequired), 401);
        assert_eq!(status(DomainError::InvalidPlacesNumber), 400);
        assert_eq!(status(DomainError::PollTitleExists), 400);
        assert_eq!(status(DomainError::AccountNotFound(Snowflake::new(1))), 404);
        assert_eq!(status(DomainError::DatabaseError("down".into())), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::InvalidCredentials.error_code(), "INVALID_CREDENTIALS");
        assert_eq!(
            AppError::Domain(DomainError::PollCapacityReached).error_code(),
            "POLL_CAPACITY_REACHED"
        );
    }

    #[test]
    fn test_messages_hide_token_failure_kind() {
        assert_eq!(
            AppError::InvalidToken.to_string(),
            AppError::TokenExpired.to_string()
        );
        assert_eq!(
            AppError::Validation("Passwords didn't match.".into()).to_string(),
            "Passwords didn't match."
        );
    }
}
