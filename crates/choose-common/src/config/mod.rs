//! Configuration structs

mod app_config;

pub use app_config::{
    AccountTokenConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, LinkConfig, MailConfig, MailTransportKind, MediaConfig,
    RateLimitConfig, ServerConfig, SnowflakeConfig,
};
