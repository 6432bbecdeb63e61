//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Operations that must be atomic (bulk poll
//! creation, capacity-checked option insertion) are single trait methods so
//! that each implementation owns its transaction boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Account, Poll, PollOption};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>>;

    /// Find account by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    /// Check if an email is taken by an account other than `exclude`
    async fn email_exists(&self, email: &str, exclude: Option<Snowflake>) -> RepoResult<bool>;

    /// Check if a username is taken by an account other than `exclude`
    async fn username_exists(&self, username: &str, exclude: Option<Snowflake>)
        -> RepoResult<bool>;

    /// Create a new account
    async fn create(&self, account: &Account) -> RepoResult<()>;

    /// Persist username and email changes
    async fn update_profile(&self, account: &Account) -> RepoResult<()>;

    /// Set the activation flag
    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()>;

    /// Replace the password hash
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Record a successful login
    async fn record_login(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Poll Repository
// ============================================================================

/// Pagination and filter for poll listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollQuery {
    /// Only polls created by this account
    pub creator_id: Option<Snowflake>,
    pub limit: i64,
    pub offset: i64,
}

impl PollQuery {
    pub fn all(limit: i64, offset: i64) -> Self {
        Self {
            creator_id: None,
            limit,
            offset,
        }
    }

    pub fn by_creator(creator_id: Snowflake, limit: i64, offset: i64) -> Self {
        Self {
            creator_id: Some(creator_id),
            limit,
            offset,
        }
    }
}

#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Find poll by its slug
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Poll>>;

    /// Check whether the title or its slug is already used
    async fn title_or_slug_exists(&self, title: &str, slug: &str) -> RepoResult<bool>;

    /// List polls, newest first
    async fn list(&self, query: PollQuery) -> RepoResult<Vec<Poll>>;

    /// Count polls, optionally only those of one creator
    async fn count(&self, creator_id: Option<Snowflake>) -> RepoResult<i64>;

    /// Insert a poll together with its options. Either everything is stored or nothing is.
    async fn create_with_options(&self, poll: &Poll, options: &[PollOption]) -> RepoResult<()>;

    /// Delete a poll owned by `creator_id`; its options go with it.
    ///
    /// Returns `PollNotFound` when no such poll belongs to the creator.
    async fn delete_owned(&self, id: Snowflake, creator_id: Snowflake) -> RepoResult<()>;

    /// Those of `names` still referenced by a poll image or an option
    async fn media_in_use(&self, names: &[String]) -> RepoResult<Vec<String>>;
}

// ============================================================================
// Option Repository
// ============================================================================

#[async_trait]
pub trait OptionRepository: Send + Sync {
    /// Find an option within a poll
    async fn find_in_poll(
        &self,
        poll_id: Snowflake,
        option_id: Snowflake,
    ) -> RepoResult<Option<PollOption>>;

    /// List the options of one poll in creation order
    async fn list_by_poll(&self, poll_id: Snowflake) -> RepoResult<Vec<PollOption>>;

    /// List the options of several polls at once
    async fn list_by_polls(&self, poll_ids: &[Snowflake]) -> RepoResult<Vec<PollOption>>;

    /// Count the options of a poll
    async fn count_by_poll(&self, poll_id: Snowflake) -> RepoResult<i64>;

    /// Insert one option unless its poll is already at capacity.
    ///
    /// The count and the insert happen under one lock on the poll, so
    /// concurrent callers can never push a poll past `places_number`.
    async fn create_within_capacity(&self, option: &PollOption) -> RepoResult<()>;

    /// Update label and media of an option
    async fn update(&self, option: &PollOption) -> RepoResult<()>;

    /// Delete an option from a poll
    async fn delete(&self, poll_id: Snowflake, option_id: Snowflake) -> RepoResult<()>;
}
