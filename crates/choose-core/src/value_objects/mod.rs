//! Value objects - immutable types that represent domain concepts

mod places;
mod slug;
mod snowflake;

pub use places::PlacesNumber;
pub use slug::Slug;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
