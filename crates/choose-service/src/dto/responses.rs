//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use choose_common::TokenPair;
use choose_core::MediaType;

use super::requests::PageRequest;

// ============================================================================
// Common Response Types
// ============================================================================

/// Page of results with neighbouring page numbers
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    /// Total number of items across all pages
    pub count: i64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}

impl<T> PageResponse<T> {
    pub fn new(results: Vec<T>, count: i64, page: PageRequest) -> Self {
        let shown = i64::from(page.page) * i64::from(page.page_size);
        Self {
            count,
            next: (shown < count).then_some(page.page + 1),
            previous: (page.page > 1).then(|| page.page - 1),
            results,
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Bearer credential pair
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<TokenPair> for AuthResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
        }
    }
}

// ============================================================================
// Account Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

// ============================================================================
// Media Responses
// ============================================================================

/// Stored media name and the URL it is served from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaResponse {
    pub name: String,
    pub url: String,
}

// ============================================================================
// Poll Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OptionResponse {
    pub id: String,
    pub label: String,
    pub media: MediaResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<MediaResponse>,
    pub media_type: MediaType,
    pub places_number: i32,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub options: Vec<OptionResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub storage: String,
}

impl ReadinessResponse {
    /// `database` is `None` when the service runs without a pool
    pub fn ready(database_healthy: Option<bool>, storage_healthy: bool) -> Self {
        let all_healthy = database_healthy.unwrap_or(true) && storage_healthy;
        let state = |healthy: bool| if healthy { "healthy" } else { "unhealthy" };
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: database_healthy.map_or("not_configured", state).to_string(),
                storage: state(storage_healthy).to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
