//! Shared building blocks for the tessen crates: errors, configuration and
//! product constants.

pub mod config;
pub mod constants;
pub mod error;
