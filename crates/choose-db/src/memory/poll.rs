use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use choose_core::entities::{Poll, PollOption};
use choose_core::error::DomainError;
use choose_core::traits::{PollQuery, PollRepository, RepoResult};
use choose_core::value_objects::Snowflake;

use super::Tables;

#[derive(Clone)]
pub struct MemoryPollRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryPollRepository {
    pub(super) fn new(tables: Arc<Mutex<Tables>>) -> Self {
        Self { tables }
    }
}

fn slice(len: usize, limit: i64, offset: i64) -> (usize, usize) {
    let offset = usize::try_from(offset).unwrap_or(0);
    let limit = usize::try_from(limit).unwrap_or(0);
    (offset.min(len), limit)
}

#[async_trait]
impl PollRepository for MemoryPollRepository {
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Poll>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .polls
            .values()
            .find(|p| p.slug.as_str() == slug)
            .cloned())
    }

    async fn title_or_slug_exists(&self, title: &str, slug: &str) -> RepoResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .polls
            .values()
            .any(|p| p.title == title || p.slug.as_str() == slug))
    }

    async fn list(&self, query: PollQuery) -> RepoResult<Vec<Poll>> {
        let tables = self.tables.lock().await;
        let matching: Vec<&Poll> = tables
            .polls
            .values()
            .rev()
            .filter(|p| query.creator_id.map_or(true, |c| p.creator_id == c))
            .collect();
        let (skip, take) = slice(matching.len(), query.limit, query.offset);
        Ok(matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self, creator_id: Option<Snowflake>) -> RepoResult<i64> {
        let tables = self.tables.lock().await;
        let count = tables
            .polls
            .values()
            .filter(|p| creator_id.map_or(true, |c| p.creator_id == c))
            .count();
        Ok(count as i64)
    }

    async fn create_with_options(&self, poll: &Poll, options: &[PollOption]) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        if tables
            .polls
            .values()
            .any(|p| p.title == poll.title || p.slug == poll.slug)
        {
            return Err(DomainError::PollTitleExists);
        }
        tables.polls.insert(poll.id.into_inner(), poll.clone());
        for option in options {
            let mut option = option.clone();
            option.poll_id = poll.id;
            tables.options.insert(option.id.into_inner(), option);
        }
        Ok(())
    }

    async fn delete_owned(&self, id: Snowflake, creator_id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .polls
            .get(&id.into_inner())
            .is_some_and(|p| p.creator_id == creator_id);
        if !owned {
            return Err(DomainError::PollNotFound(id.to_string()));
        }
        tables.polls.remove(&id.into_inner());
        tables.options.retain(|_, o| o.poll_id != id);
        Ok(())
    }

    async fn media_in_use(&self, names: &[String]) -> RepoResult<Vec<String>> {
        let tables = self.tables.lock().await;
        Ok(names
            .iter()
            .filter(|name| {
                tables
                    .polls
                    .values()
                    .any(|p| p.image.as_deref() == Some(name.as_str()))
                    || tables.options.values().any(|o| &o.media == *name)
            })
            .cloned()
            .collect())
    }
}
