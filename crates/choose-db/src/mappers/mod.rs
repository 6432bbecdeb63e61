//! Entity <-> Model mappers
//!
//! Conversions between database rows and domain entities.

mod account;
mod poll;
