use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use choose_core::entities::PollOption;
use choose_core::error::DomainError;
use choose_core::traits::{OptionRepository, RepoResult};
use choose_core::value_objects::Snowflake;

use super::Tables;

#[derive(Clone)]
pub struct MemoryOptionRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryOptionRepository {
    pub(super) fn new(tables: Arc<Mutex<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl OptionRepository for MemoryOptionRepository {
    async fn find_in_poll(
        &self,
        poll_id: Snowflake,
        option_id: Snowflake,
    ) -> RepoResult<Option<PollOption>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .options
            .get(&option_id.into_inner())
            .filter(|o| o.belongs_to(poll_id))
            .cloned())
    }

    async fn list_by_poll(&self, poll_id: Snowflake) -> RepoResult<Vec<PollOption>> {
        let tables = self.tables.lock().await;
        Ok(tables.options_of(poll_id.into_inner()).cloned().collect())
    }

    async fn list_by_polls(&self, poll_ids: &[Snowflake]) -> RepoResult<Vec<PollOption>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .options
            .values()
            .filter(|o| poll_ids.contains(&o.poll_id))
            .cloned()
            .collect())
    }

    async fn count_by_poll(&self, poll_id: Snowflake) -> RepoResult<i64> {
        let tables = self.tables.lock().await;
        Ok(tables.options_of(poll_id.into_inner()).count() as i64)
    }

    async fn create_within_capacity(&self, option: &PollOption) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        let places = tables
            .polls
            .get(&option.poll_id.into_inner())
            .map(|p| p.places_number)
            .ok_or_else(|| DomainError::PollNotFound(option.poll_id.to_string()))?;

        if tables.options_of(option.poll_id.into_inner()).count() >= places.as_usize() {
            return Err(DomainError::PollCapacityReached);
        }
        tables
            .options
            .insert(option.id.into_inner(), option.clone());
        Ok(())
    }

    async fn update(&self, option: &PollOption) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        let stored = tables
            .options
            .get_mut(&option.id.into_inner())
            .filter(|o| o.belongs_to(option.poll_id))
            .ok_or(DomainError::OptionNotFound(option.id))?;
        stored.label.clone_from(&option.label);
        stored.media.clone_from(&option.media);
        Ok(())
    }

    async fn delete(&self, poll_id: Snowflake, option_id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        let belongs = tables
            .options
            .get(&option_id.into_inner())
            .is_some_and(|o| o.belongs_to(poll_id));
        if !belongs {
            return Err(DomainError::OptionNotFound(option_id));
        }
        tables.options.remove(&option_id.into_inner());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::MemoryDatabase;
    use super::*;
    use choose_core::entities::{MediaType, Poll};
    use choose_core::traits::PollRepository;
    use choose_core::value_objects::PlacesNumber;

    #[tokio::test]
    async fn test_capacity_enforced() {
        let db = MemoryDatabase::new();
        let poll = Poll::new(
            Snowflake::new(1),
            Snowflake::new(9),
            "Dogs".to_string(),
            MediaType::Image,
            PlacesNumber::new(2).unwrap(),
        )
        .unwrap();
        db.polls().create_with_options(&poll, &[]).await.unwrap();

        let options = db.options();
        for id in 10..12 {
            let option = PollOption::new(
                Snowflake::new(id),
                poll.id,
                format!("Dog {id}"),
                "dog.jpeg".to_string(),
            );
            options.create_within_capacity(&option).await.unwrap();
        }

        let extra = PollOption::new(
            Snowflake::new(12),
            poll.id,
            "One too many".to_string(),
            "dog.jpeg".to_string(),
        );
        let err = options.create_within_capacity(&extra).await.unwrap_err();
        assert!(matches!(err, DomainError::PollCapacityReached));
        assert_eq!(options.count_by_poll(poll.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_option_scoped_to_poll() {
        let db = MemoryDatabase::new();
        let options = db.options();
        let err = options
            .delete(Snowflake::new(1), Snowflake::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OptionNotFound(_)));
        assert!(options
            .find_in_poll(Snowflake::new(1), Snowflake::new(2))
            .await
            .unwrap()
            .is_none());
    }
}
