//! Plugin descriptor handling for EduAccess Mapper
//!
//! This crate reads the plugin's `metadata.txt`, turns it into a typed
//! [`PluginDescriptor`](types::PluginDescriptor), lints it the way the host
//! plugin manager would, and writes it back out.

pub mod loader;
pub mod parser;
pub mod schema;
pub mod serializer;
pub mod validation;

pub use loader::{DescriptorLoader, SAMPLE_METADATA};
pub use parser::{parse, RawDescriptor, GENERAL_SECTION};
pub use schema::{validate, FieldKind, FieldSpec, KNOWN_FIELDS, MANDATORY_FIELDS};
pub use serializer::serialize;
pub use validation::*;

use types::{DescriptorResult, PluginDescriptor};

/// Parse and validate descriptor text in one step
pub fn parse_descriptor(text: &str) -> DescriptorResult<PluginDescriptor> {
    validate(&parse(text)?)
}
