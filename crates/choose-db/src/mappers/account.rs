//! Account entity <-> model mapper

use choose_core::entities::Account;
use choose_core::value_objects::Snowflake;

use crate::models::AccountModel;

impl From<AccountModel> for Account {
    fn from(model: AccountModel) -> Self {
        Account {
            id: Snowflake::new(model.id),
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
