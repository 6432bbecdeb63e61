//! In-memory repositories for tests
//!
//! All three repositories share one [`MemoryDatabase`], so cascades and the
//! capacity check behave like the PostgreSQL implementations. Every method
//! takes the single lock for its whole duration.

mod account;
mod option;
mod poll;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use choose_core::entities::{Account, Poll, PollOption};

pub use account::MemoryAccountRepository;
pub use option::MemoryOptionRepository;
pub use poll::MemoryPollRepository;

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    polls: BTreeMap<i64, Poll>,
    options: BTreeMap<i64, PollOption>,
}

impl Tables {
    fn options_of(&self, poll_id: i64) -> impl Iterator<Item = &PollOption> {
        self.options
            .values()
            .filter(move |o| o.poll_id.into_inner() == poll_id)
    }
}

/// Shared backing store for the in-memory repositories
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> MemoryAccountRepository {
        MemoryAccountRepository::new(self.tables.clone())
    }

    pub fn polls(&self) -> MemoryPollRepository {
        MemoryPollRepository::new(self.tables.clone())
    }

    pub fn options(&self) -> MemoryOptionRepository {
        MemoryOptionRepository::new(self.tables.clone())
    }
}
