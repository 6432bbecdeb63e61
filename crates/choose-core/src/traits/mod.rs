//! Ports the infrastructure layer implements

mod notifier;
mod repositories;
mod storage;

pub use notifier::{Notification, Notifier};
pub use repositories::{AccountRepository, OptionRepository, PollQuery, PollRepository, RepoResult};
pub use storage::ObjectStore;
