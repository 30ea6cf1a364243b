//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Descriptor checking configuration
    #[serde(default)]
    pub descriptor: DescriptorSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Descriptor checking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSettings {
    /// Descriptor used when a command is given no path
    #[serde(default = "default_descriptor_path")]
    pub path: String,
    /// Host version to check compatibility against
    #[serde(default)]
    pub host_version: Option<String>,
    /// Treat lint warnings as failures
    #[serde(default = "default_false")]
    pub strict: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_descriptor_path() -> String {
    "metadata.txt".to_string()
}

fn default_false() -> bool {
    false
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for DescriptorSettings {
    fn default() -> Self {
        Self {
            path: default_descriptor_path(),
            host_version: None,
            strict: default_false(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
