//! # choose-db
//!
//! Postgres storage for accounts, polls and options.
//!
//! The `Pg*Repository` types implement the repository traits from
//! `choose-core` on top of an SQLx pool. Poll creation writes the poll and
//! its options in one transaction; adding an option locks the poll row
//! so the capacity check cannot race.
//!
//! Enable `test-utils` for the in-memory repositories used by the service
//! and HTTP tests.
//!
//! ```rust,ignore
//! use choose_db::{create_pool, run_migrations, PgPollRepository, PoolSettings};
//!
//! let pool = create_pool(&PoolSettings::new(database_url)).await?;
//! run_migrations(&pool).await?;
//! let polls = PgPollRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

#[cfg(feature = "test-utils")]
pub mod memory;

pub use pool::{create_pool, run_migrations, PgPool, PoolSettings, MIGRATOR};
pub use repositories::{PgAccountRepository, PgOptionRepository, PgPollRepository};

#[cfg(feature = "test-utils")]
pub use memory::{
    MemoryAccountRepository, MemoryDatabase, MemoryOptionRepository, MemoryPollRepository,
};
