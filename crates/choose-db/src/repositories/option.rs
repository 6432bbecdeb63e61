//! PostgreSQL implementation of OptionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use choose_core::entities::PollOption;
use choose_core::error::DomainError;
use choose_core::traits::{OptionRepository, RepoResult};
use choose_core::value_objects::Snowflake;

use crate::models::PollOptionModel;

use super::error::{map_db_error, option_not_found, poll_not_found};

/// PostgreSQL implementation of OptionRepository
#[derive(Clone)]
pub struct PgOptionRepository {
    pool: PgPool,
}

impl PgOptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OptionRepository for PgOptionRepository {
    #[instrument(skip(self))]
    async fn find_in_poll(
        &self,
        poll_id: Snowflake,
        option_id: Snowflake,
    ) -> RepoResult<Option<PollOption>> {
        let result = sqlx::query_as::<_, PollOptionModel>(
            r"
            SELECT id, poll_id, label, media, created_at
            FROM poll_options
            WHERE id = $1 AND poll_id = $2
            ",
        )
        .bind(option_id.into_inner())
        .bind(poll_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(PollOption::from))
    }

    #[instrument(skip(self))]
    async fn list_by_poll(&self, poll_id: Snowflake) -> RepoResult<Vec<PollOption>> {
        let rows = sqlx::query_as::<_, PollOptionModel>(
            r"
            SELECT id, poll_id, label, media, created_at
            FROM poll_options
            WHERE poll_id = $1
            ORDER BY id
            ",
        )
        .bind(poll_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PollOption::from).collect())
    }

    #[instrument(skip(self, poll_ids), fields(polls = poll_ids.len()))]
    async fn list_by_polls(&self, poll_ids: &[Snowflake]) -> RepoResult<Vec<PollOption>> {
        if poll_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = poll_ids.iter().map(|id| id.into_inner()).collect();

        let rows = sqlx::query_as::<_, PollOptionModel>(
            r"
            SELECT id, poll_id, label, media, created_at
            FROM poll_options
            WHERE poll_id = ANY($1)
            ORDER BY poll_id, id
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PollOption::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_poll(&self, poll_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM poll_options WHERE poll_id = $1")
            .bind(poll_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, option), fields(poll_id = %option.poll_id, option_id = %option.id))]
    async fn create_within_capacity(&self, option: &PollOption) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock on the poll serializes concurrent inserts for the same poll
        let places_number = sqlx::query_scalar::<_, i32>(
            "SELECT places_number FROM polls WHERE id = $1 FOR UPDATE",
        )
        .bind(option.poll_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| poll_not_found(option.poll_id))?;

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM poll_options WHERE poll_id = $1",
        )
        .bind(option.poll_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if count >= i64::from(places_number) {
            debug!(count, places_number, "Poll at capacity");
            return Err(DomainError::PollCapacityReached);
        }

        sqlx::query(
            r"
            INSERT INTO poll_options (id, poll_id, label, media, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(option.id.into_inner())
        .bind(option.poll_id.into_inner())
        .bind(&option.label)
        .bind(&option.media)
        .bind(option.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, option), fields(option_id = %option.id))]
    async fn update(&self, option: &PollOption) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE poll_options SET label = $3, media = $4 WHERE id = $1 AND poll_id = $2",
        )
        .bind(option.id.into_inner())
        .bind(option.poll_id.into_inner())
        .bind(&option.label)
        .bind(&option.media)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(option_not_found(option.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, poll_id: Snowflake, option_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM poll_options WHERE id = $1 AND poll_id = $2")
            .bind(option_id.into_inner())
            .bind(poll_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(option_not_found(option_id));
        }

        Ok(())
    }
}
