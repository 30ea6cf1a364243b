//! Line-oriented parser for the sectioned `key=value` descriptor format

use std::collections::BTreeMap;

use tracing::debug;
use types::{DescriptorError, DescriptorResult};

/// Section holding the plugin metadata
pub const GENERAL_SECTION: &str = "general";

/// Untyped key/value pairs grouped by section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDescriptor {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl RawDescriptor {
    /// Create an empty raw descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Key/value pairs of one section
    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(name)
    }

    /// Key/value pairs of the `[general]` section
    pub fn general(&self) -> Option<&BTreeMap<String, String>> {
        self.section(GENERAL_SECTION)
    }

    /// Look up a value in a section
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Iterate over sections in name order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.sections
            .iter()
            .map(|(name, entries)| (name.as_str(), entries))
    }

    /// Insert a value, replacing any earlier value for the same key
    pub fn insert(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into())
    }

    fn open_section(&mut self, name: &str) {
        self.sections.entry(name.to_string()).or_default();
    }
}

/// Split descriptor text into sections of trimmed key/value pairs
///
/// Comment lines (first non-blank character `#`) and blank lines are skipped
/// wherever they appear. Each remaining line is a `[section]` header or is
/// split on its first `=`. Later duplicates of a key win.
pub fn parse(text: &str) -> DescriptorResult<RawDescriptor> {
    let mut raw = RawDescriptor::new();
    let mut current: Option<String> = None;

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(header) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let name = header.trim();
            if name.is_empty() {
                return Err(DescriptorError::MalformedLine {
                    line: line_number,
                    content: line.to_string(),
                });
            }
            raw.open_section(name);
            current = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(DescriptorError::MalformedLine {
                line: line_number,
                content: line.to_string(),
            });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(DescriptorError::MalformedLine {
                line: line_number,
                content: line.to_string(),
            });
        }

        let Some(section) = current.as_deref() else {
            return Err(DescriptorError::MissingSectionHeader {
                line: line_number,
                content: line.to_string(),
            });
        };

        if let Some(previous) = raw.insert(section, key, value.trim()) {
            debug!(
                section,
                key,
                previous = %previous,
                line = line_number,
                "Duplicate descriptor key, keeping the later value"
            );
        }
    }

    Ok(raw)
}
