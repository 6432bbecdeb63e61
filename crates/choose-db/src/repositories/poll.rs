//! PostgreSQL implementation of PollRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use choose_core::entities::{Poll, PollOption};
use choose_core::error::DomainError;
use choose_core::traits::{PollQuery, PollRepository, RepoResult};
use choose_core::value_objects::Snowflake;

use crate::models::PollModel;

use super::error::{map_db_error, map_unique_violation, poll_not_found};

const POLL_COLUMNS: &str =
    "id, creator_id, title, slug, description, image, media_type, places_number, created_at";

/// PostgreSQL implementation of PollRepository
#[derive(Clone)]
pub struct PgPollRepository {
    pool: PgPool,
}

impl PgPollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PollRepository for PgPollRepository {
    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Poll>> {
        let result = sqlx::query_as::<_, PollModel>(&format!(
            "SELECT {POLL_COLUMNS} FROM polls WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Poll::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn title_or_slug_exists(&self, title: &str, slug: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM polls WHERE title = $1 OR slug = $2)",
        )
        .bind(title)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: PollQuery) -> RepoResult<Vec<Poll>> {
        let rows = sqlx::query_as::<_, PollModel>(&format!(
            r"
            SELECT {POLL_COLUMNS} FROM polls
            WHERE ($1::BIGINT IS NULL OR creator_id = $1)
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(query.creator_id.map(Snowflake::into_inner))
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Poll::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count(&self, creator_id: Option<Snowflake>) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM polls WHERE ($1::BIGINT IS NULL OR creator_id = $1)",
        )
        .bind(creator_id.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, poll, options), fields(poll_id = %poll.id, options = options.len()))]
    async fn create_with_options(&self, poll: &Poll, options: &[PollOption]) -> RepoResult<()> {
        // Dropping the transaction on any error rolls everything back
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO polls (id, creator_id, title, slug, description, image, media_type,
                               places_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(poll.id.into_inner())
        .bind(poll.creator_id.into_inner())
        .bind(&poll.title)
        .bind(poll.slug.as_str())
        .bind(&poll.description)
        .bind(&poll.image)
        .bind(poll.media_type.as_str())
        .bind(poll.places_number.get())
        .bind(poll.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::PollTitleExists))?;

        for option in options {
            sqlx::query(
                r"
                INSERT INTO poll_options (id, poll_id, label, media, created_at)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(option.id.into_inner())
            .bind(poll.id.into_inner())
            .bind(&option.label)
            .bind(&option.media)
            .bind(option.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_owned(&self, id: Snowflake, creator_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM polls WHERE id = $1 AND creator_id = $2")
            .bind(id.into_inner())
            .bind(creator_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(poll_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, names), fields(names = names.len()))]
    async fn media_in_use(&self, names: &[String]) -> RepoResult<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_scalar::<_, String>(
            r"
            SELECT image FROM polls WHERE image = ANY($1)
            UNION
            SELECT media FROM poll_options WHERE media = ANY($1)
            ",
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
