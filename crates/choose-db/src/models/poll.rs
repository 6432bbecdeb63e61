//! Poll and option database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the polls table
#[derive(Debug, Clone, FromRow)]
pub struct PollModel {
    pub id: i64,
    pub creator_id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub media_type: String,
    pub places_number: i32,
    pub created_at: DateTime<Utc>,
}

/// Database model for the poll_options table
#[derive(Debug, Clone, FromRow)]
pub struct PollOptionModel {
    pub id: i64,
    pub poll_id: i64,
    pub label: String,
    pub media: String,
    pub created_at: DateTime<Utc>,
}
