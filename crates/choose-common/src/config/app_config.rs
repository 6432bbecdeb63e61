//! Application configuration structs
//!
//! Loads configuration from environment variables, optionally seeded from a `.env` file.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub account_tokens: AccountTokenConfig,
    pub links: LinkConfig,
    pub media: MediaConfig,
    pub mail: MailConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Largest accepted request body, uploads included
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 8080,
            request_timeout_secs: 30,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Apply embedded migrations at start-up
    pub run_migrations: bool,
}

/// Bearer credential configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

/// Activation and password-reset token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AccountTokenConfig {
    pub secret: String,
    /// Whole days a token stays valid after the day it was issued
    pub timeout_days: i64,
}

/// Front-end pages that receive account tokens
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    pub activation_url: String,
    pub password_reset_url: String,
}

impl LinkConfig {
    /// Append the token as a query parameter
    #[must_use]
    pub fn activation_link(&self, token: &str) -> String {
        append_token(&self.activation_url, token)
    }

    #[must_use]
    pub fn password_reset_link(&self, token: &str) -> String {
        append_token(&self.password_reset_url, token)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            activation_url: "http://localhost:3000/activate".to_string(),
            password_reset_url: "http://localhost:3000/password/reset".to_string(),
        }
    }
}

fn append_token(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}token={token}")
}

/// Uploaded media configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Directory the local object store writes to
    pub root: String,
    /// Public URL prefix stored names are served under
    pub base_url: String,
    pub image_max_width: u32,
    /// Extension (and encoding) every stored image gets
    pub image_default_extension: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: "./media".to_string(),
            base_url: "/media/".to_string(),
            image_max_width: 1024,
            image_default_extension: "jpeg".to_string(),
        }
    }
}

/// How outgoing mail is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// Write messages to the log only
    #[default]
    Log,
    Smtp,
}

impl FromStr for MailTransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "smtp" => Ok(Self::Smtp),
            other => Err(ConfigError::InvalidValue("MAIL_TRANSPORT", other.to_string())),
        }
    }
}

/// Mail configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub transport: MailTransportKind,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_starttls: bool,
    pub from: String,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransportKind::Log,
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_starttls: true,
            from: "Choose One Support <noreply@chooseone.local>".to_string(),
            max_retries: 3,
            retry_delay_secs: 30,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u32,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 10,
            burst: 50,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; empty or `*` allows any
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    pub max_age_secs: u64,
}

impl CorsConfig {
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "choose-one".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Read an optional variable, treating empty values as unset
fn var(key: &'static str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    var(key).ok_or(ConfigError::MissingVar(key))
}

/// Parse a variable, falling back to `default` when unset
fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let server_defaults = ServerConfig::default();
        let media_defaults = MediaConfig::default();
        let mail_defaults = MailConfig::default();
        let link_defaults = LinkConfig::default();
        let rate_defaults = RateLimitConfig::default();

        let jwt_secret = required("JWT_SECRET")?;

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_or("APP_ENV", Environment::default())?,
            },
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(default_host),
                port: parse_or("SERVER_PORT", server_defaults.port)?,
                request_timeout_secs: parse_or(
                    "REQUEST_TIMEOUT_SECS",
                    server_defaults.request_timeout_secs,
                )?,
                max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", server_defaults.max_upload_bytes)?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_or("DATABASE_MIN_CONNECTIONS", 1)?,
                acquire_timeout_secs: parse_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
                run_migrations: parse_or("DATABASE_RUN_MIGRATIONS", true)?,
            },
            account_tokens: AccountTokenConfig {
                secret: var("ACCOUNT_TOKEN_SECRET").unwrap_or_else(|| jwt_secret.clone()),
                timeout_days: parse_or("ACCOUNT_TOKEN_TIMEOUT_DAYS", 1)?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expiry: parse_or("JWT_ACCESS_TOKEN_EXPIRY", 900)?,
                refresh_token_expiry: parse_or("JWT_REFRESH_TOKEN_EXPIRY", 604_800)?,
            },
            links: LinkConfig {
                activation_url: var("USER_ACTIVATION_URL").unwrap_or(link_defaults.activation_url),
                password_reset_url: var("PASSWORD_RESET_URL")
                    .unwrap_or(link_defaults.password_reset_url),
            },
            media: MediaConfig {
                root: var("MEDIA_ROOT").unwrap_or(media_defaults.root),
                base_url: var("MEDIA_URL").unwrap_or(media_defaults.base_url),
                image_max_width: parse_or("IMAGE_MAX_WIDTH", media_defaults.image_max_width)?,
                image_default_extension: var("IMAGE_DEFAULT_EXTENSION")
                    .unwrap_or(media_defaults.image_default_extension),
            },
            mail: MailConfig {
                transport: parse_or("MAIL_TRANSPORT", mail_defaults.transport)?,
                smtp_host: var("SMTP_HOST"),
                smtp_port: parse_or("SMTP_PORT", mail_defaults.smtp_port)?,
                smtp_username: var("SMTP_USERNAME"),
                smtp_password: var("SMTP_PASSWORD"),
                smtp_starttls: parse_or("SMTP_STARTTLS", mail_defaults.smtp_starttls)?,
                from: var("MAIL_FROM").unwrap_or(mail_defaults.from),
                max_retries: parse_or("MAIL_MAX_RETRIES", mail_defaults.max_retries)?,
                retry_delay_secs: parse_or("MAIL_RETRY_DELAY_SECS", mail_defaults.retry_delay_secs)?,
            },
            rate_limit: RateLimitConfig {
                enabled: parse_or("RATE_LIMIT_ENABLED", rate_defaults.enabled)?,
                requests_per_second: parse_or(
                    "RATE_LIMIT_PER_SECOND",
                    rate_defaults.requests_per_second,
                )?,
                burst: parse_or("RATE_LIMIT_BURST", rate_defaults.burst)?,
            },
            cors: CorsConfig {
                allowed_origins: var("CORS_ALLOWED_ORIGINS")
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
                max_age_secs: parse_or("CORS_MAX_AGE", 3600)?,
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_or("WORKER_ID", 0)?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
