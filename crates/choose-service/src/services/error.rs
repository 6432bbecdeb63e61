//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use choose_common::{domain_status, AppError};
use choose_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, validation, etc.)
    App(AppError),

    /// Validation error not tied to one field
    Validation(String),

    /// Validation error reported against a request field
    InvalidField { field: &'static str, message: String },

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Validation(msg) | Self::InvalidField { message: msg, .. } => {
                write!(f, "{msg}")
            }
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a validation error for one request field
    pub fn invalid_field(field: &'static str, msg: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: msg.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::Validation(_) | Self::InvalidField { .. } => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation(_) | Self::InvalidField { .. } => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Request field the error belongs to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Domain(e) => e.field(),
            Self::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Validation(msg) | ServiceError::InvalidField { message: msg, .. } => {
                AppError::Validation(msg)
            }
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::from(DomainError::PollNotFound("best-pizza".to_string()));
        assert_eq!(err.status_code(), 404);
        assert!(err.to_string().contains("best-pizza"));
    }

    #[test]
    fn test_field_error() {
        let err = ServiceError::invalid_field("password", "The two password fields didn't match.");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.field(), Some("password"));
        assert_eq!(err.to_string(), "The two password fields didn't match.");
    }

    #[test]
    fn test_domain_mapping() {
        let err = ServiceError::from(DomainError::NotPollCreator);
        assert_eq!(err.status_code(), 404);

        let err = ServiceError::from(DomainError::InvalidPlacesNumber);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.field(), Some("places_number"));

        let err = ServiceError::from(DomainError::PollTitleExists);
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_auth_errors_are_401() {
        assert_eq!(
            ServiceError::from(AppError::InvalidCredentials).status_code(),
            401
        );
        assert_eq!(
            ServiceError::from(DomainError::AuthenticationRequired).status_code(),
            401
        );
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::validation("bad").into();
        assert_eq!(app_err.status_code(), 400);

        let app_err: AppError = ServiceError::internal("boom").into();
        assert_eq!(app_err.status_code(), 500);
    }
}
