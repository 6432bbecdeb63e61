//! # choose-common
//!
//! Shared infrastructure: configuration, error handling, credentials, account
//! tokens, telemetry, media storage and mail transports.

pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    ensure_passwords_match, hash_password, validate_password_strength, verify_password,
    AccountTokenGenerator, Claims, JwtService, TokenPair, TokenPurpose, TokenType,
};
pub use config::{
    AccountTokenConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, LinkConfig, MailConfig, MailTransportKind, MediaConfig,
    RateLimitConfig, ServerConfig, SnowflakeConfig,
};
pub use error::{domain_status, AppError};
pub use mail::{LogMailer, MailError, Mailer, OutgoingMail, SmtpMailer};
pub use storage::{is_valid_name, LocalObjectStore};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
