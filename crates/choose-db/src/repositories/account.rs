//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use choose_core::entities::Account;
use choose_core::error::DomainError;
use choose_core::traits::{AccountRepository, RepoResult};
use choose_core::value_objects::Snowflake;

use crate::models::AccountModel;

use super::error::{account_not_found, map_db_error, map_unique_violation};

const ACCOUNT_COLUMNS: &str = "id, email, username, password_hash, is_active, is_staff, \
                               is_superuser, last_login, created_at, updated_at";

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn duplicate_account(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some("accounts_username_key") => DomainError::UsernameAlreadyExists,
        _ => DomainError::EmailAlreadyExists,
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str, exclude: Option<Snowflake>) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM accounts
                WHERE LOWER(email) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
            )
            ",
        )
        .bind(email)
        .bind(exclude.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn username_exists(
        &self,
        username: &str,
        exclude: Option<Snowflake>,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM accounts
                WHERE username = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            ",
        )
        .bind(username)
        .bind(exclude.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn create(&self, account: &Account) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO accounts (id, email, username, password_hash, is_active, is_staff,
                                  is_superuser, last_login, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(account.id.into_inner())
        .bind(&account.email)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.is_active)
        .bind(account.is_staff)
        .bind(account.is_superuser)
        .bind(account.last_login)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, duplicate_account))?;

        Ok(())
    }

    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn update_profile(&self, account: &Account) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE accounts
            SET username = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(account.id.into_inner())
        .bind(&account.username)
        .bind(&account.email)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, duplicate_account))?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(account.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET is_active = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_login(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query("UPDATE accounts SET last_login = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(id));
        }

        Ok(())
    }
}
