//! # choose-api
//!
//! HTTP surface of the Choose One backend: JSON endpoints under `/api`,
//! stored media under `/media` and health probes. The binary wires the
//! Postgres repositories in; tests build the same router over in-memory ones.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{base_context, create_app, create_app_state, run, run_server};
pub use state::AppState;
