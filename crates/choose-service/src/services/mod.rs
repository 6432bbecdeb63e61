//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod account;
pub mod auth;
pub mod context;
pub mod error;
pub mod media;
pub mod notify;
pub mod option;
pub mod poll;

use choose_core::access::{authorize, Operation};
use choose_core::error::DomainError;
use choose_core::Snowflake;

// Re-export all services for convenience
pub use account::AccountService;
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use media::MediaService;
pub use notify::{MailNotifier, RetryConfig};
pub use option::OptionService;
pub use poll::PollService;

/// Run the access rules and return the caller's identity.
///
/// `not_found` builds the error a non-owner sees.
pub(crate) fn require_access(
    identity: Option<Snowflake>,
    operation: Operation,
    owner: Option<Snowflake>,
    not_found: impl FnOnce() -> DomainError,
) -> ServiceResult<Snowflake> {
    authorize(identity, operation, owner).into_result(not_found)?;
    identity.ok_or_else(|| DomainError::AuthenticationRequired.into())
}
