//! Configuration module
//!
//! This module handles loading git-open-pull settings from git config and
//! `GITOPENPULL_*` environment variables.

pub mod loader;
pub mod schema;

// Re-export public types and functions
pub use loader::{parse_bool, parse_seconds, GitConfigSettings};
pub use schema::Settings;
