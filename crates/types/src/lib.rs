//! Shared types for the EduAccess Mapper descriptor toolkit
//!
//! This crate contains the plugin descriptor value type, host version
//! numbers, error types and the flag/tag coercion helpers shared by the
//! parser, the settings loader and the command line tool.

pub mod descriptor;
pub mod error;
pub mod utils;
pub mod version;

// Re-export commonly used types
pub use descriptor::{Category, PluginDescriptor};
pub use error::{ConfigError, DescriptorError, DescriptorResult, MapperError, Result};
pub use version::HostVersion;
