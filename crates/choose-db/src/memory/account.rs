use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use choose_core::entities::Account;
use choose_core::error::DomainError;
use choose_core::traits::{AccountRepository, RepoResult};
use choose_core::value_objects::Snowflake;

use super::Tables;

#[derive(Clone)]
pub struct MemoryAccountRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryAccountRepository {
    pub(super) fn new(tables: Arc<Mutex<Tables>>) -> Self {
        Self { tables }
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn taken_by_other(account: &Account, exclude: Option<Snowflake>) -> bool {
    exclude.map_or(true, |id| account.id != id)
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        let tables = self.tables.lock().await;
        Ok(tables.accounts.get(&id.into_inner()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| same_email(&a.email, email))
            .cloned())
    }

    async fn email_exists(&self, email: &str, exclude: Option<Snowflake>) -> RepoResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .accounts
            .values()
            .any(|a| same_email(&a.email, email) && taken_by_other(a, exclude)))
    }

    async fn username_exists(
        &self,
        username: &str,
        exclude: Option<Snowflake>,
    ) -> RepoResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .accounts
            .values()
            .any(|a| a.username == username && taken_by_other(a, exclude)))
    }

    async fn create(&self, account: &Account) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        if tables
            .accounts
            .values()
            .any(|a| same_email(&a.email, &account.email))
        {
            return Err(DomainError::EmailAlreadyExists);
        }
        if tables
            .accounts
            .values()
            .any(|a| a.username == account.username)
        {
            return Err(DomainError::UsernameAlreadyExists);
        }
        tables
            .accounts
            .insert(account.id.into_inner(), account.clone());
        Ok(())
    }

    async fn update_profile(&self, account: &Account) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        let others = || tables.accounts.values().filter(|a| a.id != account.id);
        if others().any(|a| same_email(&a.email, &account.email)) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if others().any(|a| a.username == account.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        let stored = tables
            .accounts
            .get_mut(&account.id.into_inner())
            .ok_or(DomainError::AccountNotFound(account.id))?;
        stored.set_username(account.username.clone());
        stored.set_email(&account.email);
        Ok(())
    }

    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        let stored = tables
            .accounts
            .get_mut(&id.into_inner())
            .ok_or(DomainError::AccountNotFound(id))?;
        stored.is_active = active;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        let stored = tables
            .accounts
            .get_mut(&id.into_inner())
            .ok_or(DomainError::AccountNotFound(id))?;
        stored.set_password_hash(password_hash.to_string());
        Ok(())
    }

    async fn record_login(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        let mut tables = self.tables.lock().await;
        let stored = tables
            .accounts
            .get_mut(&id.into_inner())
            .ok_or(DomainError::AccountNotFound(id))?;
        stored.record_login(at);
        Ok(())
    }
}
