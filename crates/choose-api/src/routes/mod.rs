//! Route definitions
//!
//! JSON endpoints are mounted under /api; stored media is served from /media.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{auth, health, media, options, polls, profile};
use crate::state::AppState;

/// Create the main router (health is exported separately)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .route("/media/:name", get(media::serve_media))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(poll_routes())
        .route("/static/image", post(media::upload_image))
}

/// Credential and registration routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(auth::obtain))
        .route("/auth/verify", post(auth::verify))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/register", post(auth::register))
        .route("/auth/activate", post(auth::activate))
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::get_profile)
                .put(profile::replace_profile)
                .patch(profile::patch_profile),
        )
        .route(
            "/profile/password/update",
            put(profile::change_password).patch(profile::change_password),
        )
        .route("/profile/password/forget", post(profile::forget_password))
        .route("/profile/password/reset", post(profile::reset_password))
}

/// Poll and option routes
fn poll_routes() -> Router<AppState> {
    Router::new()
        .route("/polls", get(polls::list_polls).post(polls::create_poll))
        // The static segment wins over `:slug`
        .route("/polls/my-polls", get(polls::my_polls))
        .route(
            "/polls/:slug",
            get(polls::get_poll).delete(polls::delete_poll),
        )
        .route("/polls/:slug/add-option", post(options::add_option))
        .route(
            "/polls/:slug/options",
            get(options::list_options).post(options::add_option),
        )
        .route(
            "/polls/:slug/options/:option_id",
            get(options::get_option)
                .put(options::replace_option)
                .patch(options::patch_option)
                .delete(options::delete_option),
        )
}
