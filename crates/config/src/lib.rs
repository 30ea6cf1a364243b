//! Configuration management for the EduAccess Mapper tooling
//!
//! This crate handles loading and validation of the command line tool's
//! settings from YAML files and environment variables.

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use schema::*;
