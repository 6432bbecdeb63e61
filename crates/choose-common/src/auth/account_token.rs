//! Stateless account tokens for activation and password reset
//!
//! A token is `base64url(email) + "." + day + "-" + hex(hmac)`. The HMAC covers
//! the account id, the purpose, the current password hash, the last login time,
//! the email and the issuing day. Nothing is stored: changing the password or
//! logging in again makes every outstanding token fail verification.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use choose_core::Account;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

const SECONDS_PER_DAY: i64 = 86_400;

/// What a token authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Activation,
    PasswordReset,
}

impl TokenPurpose {
    fn discriminator(self) -> &'static str {
        match self {
            Self::Activation => "account-activation",
            Self::PasswordReset => "password-reset",
        }
    }
}

/// Issues and checks account tokens
#[derive(Clone)]
pub struct AccountTokenGenerator {
    keyed: HmacSha256,
    timeout_days: i64,
}

impl AccountTokenGenerator {
    /// `timeout_days` is how many whole days a token stays valid after the day it was issued.
    pub fn new(secret: &str, timeout_days: i64) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config("account token secret is empty".to_string()));
        }
        let keyed = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Config(format!("account token secret: {e}")))?;
        Ok(Self {
            keyed,
            timeout_days,
        })
    }

    /// Issue a token for `account`
    pub fn issue(&self, account: &Account, purpose: TokenPurpose) -> String {
        self.issue_at(account, purpose, Utc::now())
    }

    /// Check a token against the account's current state. Never fails, only says no.
    pub fn check(&self, account: &Account, purpose: TokenPurpose, token: &str) -> bool {
        self.check_at(account, purpose, token, Utc::now())
    }

    /// Decode the email embedded in a token, `None` if the token is malformed
    pub fn email_of(token: &str) -> Option<String> {
        split_token(token).map(|(email, _)| email)
    }

    fn issue_at(&self, account: &Account, purpose: TokenPurpose, now: DateTime<Utc>) -> String {
        let day = days_since_epoch(now);
        let signature = hex::encode(self.mac(account, purpose, day).finalize().into_bytes());
        format!(
            "{}.{}-{}",
            URL_SAFE_NO_PAD.encode(account.email.as_bytes()),
            to_base36(day),
            signature
        )
    }

    fn check_at(
        &self,
        account: &Account,
        purpose: TokenPurpose,
        token: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let Some((email, signed)) = split_token(token) else {
            return false;
        };
        if email != account.email {
            return false;
        }
        let Some((day, signature)) = signed.split_once('-') else {
            return false;
        };
        let Some(day) = from_base36(day) else {
            return false;
        };
        let Ok(signature) = hex::decode(signature) else {
            return false;
        };

        if self.mac(account, purpose, day).verify_slice(&signature).is_err() {
            return false;
        }

        let age = days_since_epoch(now) - day;
        (0..=self.timeout_days).contains(&age)
    }

    fn mac(&self, account: &Account, purpose: TokenPurpose, day: i64) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        let account_id = account.id.to_string();
        let last_login = account
            .last_login
            .map(|at| at.timestamp_micros().to_string())
            .unwrap_or_default();
        let day = day.to_string();

        let parts: [&str; 6] = [
            purpose.discriminator(),
            &account_id,
            &account.password_hash,
            &last_login,
            &account.email,
            &day,
        ];
        for part in parts {
            mac.update(part.as_bytes());
            mac.update(b"\x1f");
        }
        mac
    }
}

impl std::fmt::Debug for AccountTokenGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountTokenGenerator")
            .field("timeout_days", &self.timeout_days)
            .finish_non_exhaustive()
    }
}

fn split_token(token: &str) -> Option<(String, &str)> {
    let mut parts = token.split('.');
    let (encoded, signed) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || signed.is_empty() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    let email = String::from_utf8(bytes).ok()?;
    Some((email, signed))
}

fn days_since_epoch(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(SECONDS_PER_DAY)
}

fn to_base36(mut value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(value: &str) -> Option<i64> {
    if value.is_empty() || value.len() > 8 {
        return None;
    }
    i64::from_str_radix(value, 36).ok()
}
