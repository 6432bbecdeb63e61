//! Object store implementations

mod local;

pub use local::{is_valid_name, LocalObjectStore};
