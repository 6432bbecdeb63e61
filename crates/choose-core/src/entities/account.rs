//! Account entity - the identity anchor for every poll

use std::fmt;

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A registered user account.
///
/// Accounts start inactive and become active once the owner confirms the
/// activation link. Only active accounts may obtain a session credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Snowflake,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, inactive account
    pub fn new(id: Snowflake, email: &str, username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: Self::normalize_email(email),
            username,
            password_hash,
            is_active: false,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Lower-case the domain part of an address, leaving the local part untouched.
    pub fn normalize_email(email: &str) -> String {
        let email = email.trim();
        match email.rsplit_once('@') {
            Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
            None => email.to_string(),
        }
    }

    /// Whether this account may obtain a session credential
    #[inline]
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Mark the account active. Activating an active account is a no-op.
    pub fn activate(&mut self) {
        if !self.is_active {
            self.is_active = true;
            self.updated_at = Utc::now();
        }
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    pub fn set_username(&mut self, username: String) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = Self::normalize_email(email);
        self.updated_at = Utc::now();
    }

    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login = Some(at);
    }
}

// Keep the password hash out of logs
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .field("is_superuser", &self.is_superuser)
            .field("last_login", &self.last_login)
            .finish_non_exhaustive()
    }
}
