//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod poll;

pub use account::AccountModel;
pub use poll::{PollModel, PollOptionModel};
