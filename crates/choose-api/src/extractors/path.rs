//! Path parameter extractors

use choose_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

/// `/polls/:slug`
#[derive(Debug, Deserialize)]
pub struct PollPath {
    pub slug: String,
}

/// `/polls/:slug/options/:option_id`
#[derive(Debug, Deserialize)]
pub struct OptionPath {
    pub slug: String,
    pub option_id: String,
}

impl OptionPath {
    /// An id that is not a number cannot name an option
    pub fn option_id(&self) -> Result<Snowflake, ApiError> {
        self.option_id
            .parse()
            .map_err(|_| ApiError::invalid_path(format!("Option not found: {}", self.option_id)))
    }
}
