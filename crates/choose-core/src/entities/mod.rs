//! Domain entities - core business objects

mod account;
mod option;
mod poll;

pub use account::Account;
pub use option::PollOption;
pub use poll::{MediaType, Poll};
