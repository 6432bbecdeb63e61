//! # choose-core
//!
//! Domain layer containing entities, value objects, repository traits and access rules.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod access;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use access::{authorize, can_modify, can_read, Decision, Denial, Operation};
pub use entities::{Account, MediaType, Poll, PollOption};
pub use error::DomainError;
pub use traits::{
    AccountRepository, Notification, Notifier, ObjectStore, OptionRepository, PollQuery,
    PollRepository, RepoResult,
};
pub use value_objects::{PlacesNumber, Slug, Snowflake, SnowflakeGenerator, SnowflakeParseError};
