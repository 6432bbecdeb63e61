//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in choose-core.

mod account;
mod error;
mod option;
mod poll;

pub use account::PgAccountRepository;
pub use option::PgOptionRepository;
pub use poll::PgPollRepository;
