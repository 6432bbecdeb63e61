//! Entity to DTO mappers
//!
//! Media fields need the object store to resolve URLs, so those mappers take
//! it as an argument instead of being plain `From` impls.

use std::collections::HashMap;

use choose_core::entities::{Account, Poll, PollOption};
use choose_core::traits::ObjectStore;
use choose_core::Snowflake;

use super::responses::{AccountResponse, MediaResponse, OptionResponse, PollResponse};

// ============================================================================
// Account Mappers
// ============================================================================

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.clone(),
            email: account.email.clone(),
        }
    }
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

// ============================================================================
// Media Mappers
// ============================================================================

impl MediaResponse {
    pub fn resolve(name: &str, store: &dyn ObjectStore) -> Self {
        Self {
            name: name.to_string(),
            url: store.url(name),
        }
    }
}

// ============================================================================
// Poll Mappers
// ============================================================================

impl OptionResponse {
    pub fn from_option(option: &PollOption, store: &dyn ObjectStore) -> Self {
        Self {
            id: option.id.to_string(),
            label: option.label.clone(),
            media: MediaResponse::resolve(&option.media, store),
        }
    }
}

impl PollResponse {
    pub fn from_poll(poll: &Poll, options: &[PollOption], store: &dyn ObjectStore) -> Self {
        Self {
            id: poll.id.to_string(),
            title: poll.title.clone(),
            slug: poll.slug.to_string(),
            description: poll.description.clone(),
            image: poll
                .image
                .as_deref()
                .map(|name| MediaResponse::resolve(name, store)),
            media_type: poll.media_type,
            places_number: poll.places_number.get(),
            creator_id: poll.creator_id.to_string(),
            created_at: poll.created_at,
            options: options
                .iter()
                .map(|option| OptionResponse::from_option(option, store))
                .collect(),
        }
    }
}

/// Pair each poll with its options, keeping the polls' order
pub fn polls_with_options(
    polls: &[Poll],
    options: Vec<PollOption>,
    store: &dyn ObjectStore,
) -> Vec<PollResponse> {
    let mut by_poll: HashMap<Snowflake, Vec<PollOption>> = HashMap::new();
    for option in options {
        by_poll.entry(option.poll_id).or_default().push(option);
    }

    polls
        .iter()
        .map(|poll| {
            let options = by_poll.remove(&poll.id).unwrap_or_default();
            PollResponse::from_poll(poll, &options, store)
        })
        .collect()
}
