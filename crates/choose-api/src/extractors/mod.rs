//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path parameters and pagination.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use pagination::{Pagination, PaginationParams};
pub use path::{OptionPath, PollPath};
pub use validated::ValidatedJson;
