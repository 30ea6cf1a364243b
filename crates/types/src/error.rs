//! Error types for the EduAccess Mapper descriptor toolkit

use thiserror::Error;

/// Main error type for the descriptor toolkit
#[derive(Error, Debug)]
pub enum MapperError {
    /// Descriptor parsing or validation errors
    #[error("Descriptor error: {0}")]
    Descriptor(DescriptorError),

    /// Tool configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("I/O error: {path}: {message}")]
    Io { path: String, message: String },
}

/// Result type alias for descriptor toolkit operations
pub type Result<T> = std::result::Result<T, MapperError>;

/// Result type alias for parser and schema operations
pub type DescriptorResult<T> = std::result::Result<T, DescriptorError>;

/// Descriptor parsing and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Mandatory field absent or empty
    #[error("Missing mandatory field: {field}")]
    MissingField { field: String },

    /// Flag value outside the accepted boolean spellings
    #[error("Invalid boolean for {field}: {value:?}")]
    InvalidBoolean { field: String, value: String },

    /// Line that is neither a comment, blank, section header nor key=value
    #[error("Malformed line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    /// Key=value line that appears before any section header
    #[error("Entry outside of any section at line {line}: {content:?}")]
    MissingSectionHeader { line: usize, content: String },

    /// Version string that is not dotted numeric
    #[error("Invalid version for {field}: {value:?}")]
    InvalidVersion { field: String, value: String },
}

/// Tool configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Parse error
    #[error("Configuration parse error: {0}")]
    ParseError(String),

    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// Invalid value
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl DescriptorError {
    /// Field the error refers to, when it refers to one
    pub fn field(&self) -> Option<&str> {
        match self {
            DescriptorError::MissingField { field }
            | DescriptorError::InvalidBoolean { field, .. }
            | DescriptorError::InvalidVersion { field, .. } => Some(field),
            DescriptorError::MalformedLine { .. } | DescriptorError::MissingSectionHeader { .. } => {
                None
            }
        }
    }
}

impl From<DescriptorError> for MapperError {
    fn from(err: DescriptorError) -> Self {
        MapperError::Descriptor(err)
    }
}

impl From<ConfigError> for MapperError {
    fn from(err: ConfigError) -> Self {
        MapperError::Config(err.to_string())
    }
}
