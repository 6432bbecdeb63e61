//! Poll option entity - one selectable answer

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// One answer of a poll, illustrated by a stored media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub id: Snowflake,
    pub poll_id: Snowflake,
    pub label: String,
    /// Name of the media file in the object store
    pub media: String,
    pub created_at: DateTime<Utc>,
}

impl PollOption {
    pub fn new(id: Snowflake, poll_id: Snowflake, label: String, media: String) -> Self {
        Self {
            id,
            poll_id,
            label,
            media,
            created_at: Utc::now(),
        }
    }

    /// Check if this option belongs to the given poll
    #[inline]
    pub fn belongs_to(&self, poll_id: Snowflake) -> bool {
        self.poll_id == poll_id
    }
}
