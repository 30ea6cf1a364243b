//! Descriptor file loader

use std::path::Path;

use tracing::{debug, info};
use types::{MapperError, PluginDescriptor, Result};

use crate::{parser, schema, serializer};

/// Descriptor shipped with the plugin, used by `create_example`
pub const SAMPLE_METADATA: &str = include_str!("../fixtures/metadata.txt");

/// Loader that reads `metadata.txt` files into typed descriptors
pub struct DescriptorLoader;

impl DescriptorLoader {
    /// Load and validate a descriptor file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PluginDescriptor> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MapperError::Io {
                path: path.display().to_string(),
                message: "Descriptor file not found".to_string(),
            });
        }

        let text = std::fs::read_to_string(path).map_err(|e| MapperError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let descriptor = Self::load_from_str(&text)?;
        info!(
            path = %path.display(),
            name = %descriptor.name,
            version = %descriptor.version,
            "Loaded plugin descriptor"
        );

        Ok(descriptor)
    }

    /// Parse and validate descriptor text
    pub fn load_from_str(text: &str) -> Result<PluginDescriptor> {
        let raw = parser::parse(text)?;
        debug!(sections = raw.sections().count(), "Parsed descriptor sections");

        Ok(schema::validate(&raw)?)
    }

    /// Write a descriptor in canonical form
    pub fn save<P: AsRef<Path>>(descriptor: &PluginDescriptor, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, serializer::serialize(descriptor)).map_err(|e| MapperError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Create example descriptor file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, SAMPLE_METADATA).map_err(|e| MapperError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
