//! Postgres pool and embedded schema

use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

/// Migrations under `migrations/`, compiled into the binary
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// How the pool connects and how long connections live
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl PoolSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Some(Duration::from_secs(5 * 60)),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
        }
    }
}

impl From<&choose_common::DatabaseConfig> for PoolSettings {
    fn from(config: &choose_common::DatabaseConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            min_connections: config.min_connections.min(config.max_connections),
            acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
            ..Self::new(&config.url)
        }
    }
}

pub async fn create_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    debug!(
        max = settings.max_connections,
        min = settings.min_connections,
        "Opening Postgres pool"
    );
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .connect(&settings.url)
        .await
}

/// Bring the schema up to date
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!(known = MIGRATOR.iter().count(), "Schema migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_app_config() {
        let app = choose_common::DatabaseConfig {
            url: "postgres://u:p@db/choose".to_string(),
            max_connections: 4,
            min_connections: 2,
            acquire_timeout_secs: 3,
            run_migrations: false,
        };
        let settings = PoolSettings::from(&app);
        assert_eq!(settings.url, app.url);
        assert_eq!(settings.max_connections, 4);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(3));
        assert_eq!(settings.max_lifetime, Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_min_never_exceeds_max() {
        let app = choose_common::DatabaseConfig {
            url: String::new(),
            max_connections: 2,
            min_connections: 8,
            acquire_timeout_secs: 1,
            run_migrations: true,
        };
        assert_eq!(PoolSettings::from(&app).min_connections, 2);
    }

    #[test]
    fn test_migrations_embedded() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert!(versions.len() >= 2);
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
