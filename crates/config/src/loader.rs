//! Configuration loader implementation

use crate::schema::Settings;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use std::path::Path;
use types::{ConfigError, HostVersion};

/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "edu-access-mapper.yaml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "EDU_MAPPER_";

/// Configuration loader that handles YAML files and environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Settings> {
        let config_path = config_path.as_ref();

        // Check if config file exists
        if !config_path.exists() {
            return Err(ConfigError::FileNotFound {
                path: config_path.display().to_string(),
            }
            .into());
        }

        let settings: Settings = Figment::new()
            .merge(Yaml::file(config_path))
            // Override with environment variables (EDU_MAPPER_DESCRIPTOR__PATH, ...)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Self::validate(&settings)?;

        Ok(settings)
    }

    /// Load `DEFAULT_CONFIG_FILE` if present, otherwise defaults plus environment
    pub fn load_default() -> Result<Settings> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::load(DEFAULT_CONFIG_FILE);
        }

        let settings: Settings = Figment::new()
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Load configuration from string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Yaml::string(yaml_content))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Validate configuration
    fn validate(settings: &Settings) -> Result<()> {
        if settings.descriptor.path.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "descriptor.path".to_string(),
                message: "Descriptor path cannot be empty".to_string(),
            }
            .into());
        }

        if let Some(ref host_version) = settings.descriptor.host_version {
            if HostVersion::parse("descriptor.host_version", host_version).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "descriptor.host_version".to_string(),
                    value: host_version.clone(),
                }
                .into());
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&settings.logging.level.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logging.level".to_string(),
                message: format!(
                    "Invalid log level: {}. Valid levels: {:?}",
                    settings.logging.level, valid_log_levels
                ),
            }
            .into());
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&settings.logging.format.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logging.format".to_string(),
                message: format!(
                    "Invalid log format: {}. Valid formats: {:?}",
                    settings.logging.format, valid_log_formats
                ),
            }
            .into());
        }

        Ok(())
    }

    /// Get default configuration
    pub fn default() -> Settings {
        Settings::default()
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let settings = Self::default();
        let yaml_content = serde_yaml::to_string(&settings)
            .context("Failed to serialize default configuration")?;

        std::fs::write(path.as_ref(), yaml_content)
            .context("Failed to write example configuration file")?;

        Ok(())
    }
}
