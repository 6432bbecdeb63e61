//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod media;
pub mod options;
pub mod polls;
pub mod profile;
