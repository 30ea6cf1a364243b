//! Descriptor schema: known keys, their coercions and the typed validator

use std::collections::BTreeMap;

use tracing::debug;
use types::utils::{parse_bool, split_tags};
use types::{Category, DescriptorError, DescriptorResult, PluginDescriptor};

use crate::parser::{RawDescriptor, GENERAL_SECTION};

/// How a descriptor value is coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, kept as written
    Text,
    /// Boolean flag with tolerant spelling
    Flag,
    /// Comma separated keyword set
    Tags,
    /// Registry grouping
    Category,
}

/// A key the schema knows how to type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub mandatory: bool,
}

const fn field(key: &'static str, kind: FieldKind, mandatory: bool) -> FieldSpec {
    FieldSpec {
        key,
        kind,
        mandatory,
    }
}

/// Mandatory keys, in the order they are checked
pub const MANDATORY_FIELDS: [&str; 6] = [
    "name",
    "qgisMinimumVersion",
    "description",
    "version",
    "author",
    "email",
];

/// Every typed key, in canonical write order
pub const KNOWN_FIELDS: &[FieldSpec] = &[
    field("name", FieldKind::Text, true),
    field("qgisMinimumVersion", FieldKind::Text, true),
    field("qgisMaximumVersion", FieldKind::Text, false),
    field("description", FieldKind::Text, true),
    field("version", FieldKind::Text, true),
    field("author", FieldKind::Text, true),
    field("email", FieldKind::Text, true),
    field("about", FieldKind::Text, false),
    field("tracker", FieldKind::Text, false),
    field("repository", FieldKind::Text, false),
    field("homepage", FieldKind::Text, false),
    field("changelog", FieldKind::Text, false),
    field("plugin_dependencies", FieldKind::Text, false),
    field("hasProcessingProvider", FieldKind::Flag, false),
    field("tags", FieldKind::Tags, false),
    field("category", FieldKind::Category, false),
    field("icon", FieldKind::Text, false),
    field("experimental", FieldKind::Flag, false),
    field("deprecated", FieldKind::Flag, false),
    field("server", FieldKind::Flag, false),
];

/// Schema entry for a key, if the key is typed
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    KNOWN_FIELDS.iter().find(|spec| spec.key == key)
}

/// Whether a `[general]` key has a typed counterpart
pub fn is_known_key(key: &str) -> bool {
    field_spec(key).is_some()
}

/// Build a typed descriptor from parsed key/value pairs
///
/// Mandatory keys are checked first, in `MANDATORY_FIELDS` order, and the
/// first absent or empty one is reported. Every other `KNOWN_FIELDS` entry is
/// then coerced according to its `FieldKind`. Unknown keys and sections are
/// carried over untouched.
pub fn validate(raw: &RawDescriptor) -> DescriptorResult<PluginDescriptor> {
    let empty = BTreeMap::new();
    let general = raw.general().unwrap_or(&empty);

    // Argument order follows MANDATORY_FIELDS
    let mut descriptor = PluginDescriptor::new(
        required(general, "name")?,
        required(general, "qgisMinimumVersion")?,
        required(general, "description")?,
        required(general, "version")?,
        required(general, "author")?,
        required(general, "email")?,
    );

    for spec in KNOWN_FIELDS.iter().filter(|spec| !spec.mandatory) {
        let Some(value) = optional(general, spec.key) else {
            continue;
        };

        match spec.kind {
            FieldKind::Text => {
                if let Some(slot) = text_slot(&mut descriptor, spec.key) {
                    *slot = Some(value);
                    continue;
                }
            }
            FieldKind::Flag => {
                let flag = parse_bool(spec.key, &value)?;
                if let Some(slot) = flag_slot(&mut descriptor, spec.key) {
                    *slot = flag;
                    continue;
                }
            }
            FieldKind::Tags => {
                descriptor.tags = split_tags(&value);
                continue;
            }
            FieldKind::Category => {
                descriptor.category = Some(Category::from_str(&value));
                continue;
            }
        }

        // Known key without a typed slot stays untyped
        descriptor.extra.insert(spec.key.to_string(), value);
    }

    descriptor.extra.extend(
        general
            .iter()
            .filter(|(key, _)| !is_known_key(key))
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    descriptor.extra_sections = raw
        .sections()
        .filter(|(name, _)| *name != GENERAL_SECTION)
        .map(|(name, entries)| (name.to_string(), entries.clone()))
        .collect();

    if !descriptor.extra.is_empty() {
        debug!(
            keys = ?descriptor.extra.keys().collect::<Vec<_>>(),
            "Keeping unrecognized descriptor keys"
        );
    }

    Ok(descriptor)
}

fn text_slot<'a>(
    descriptor: &'a mut PluginDescriptor,
    key: &str,
) -> Option<&'a mut Option<String>> {
    match key {
        "qgisMaximumVersion" => Some(&mut descriptor.qgis_maximum_version),
        "about" => Some(&mut descriptor.about),
        "tracker" => Some(&mut descriptor.tracker),
        "repository" => Some(&mut descriptor.repository),
        "homepage" => Some(&mut descriptor.homepage),
        "changelog" => Some(&mut descriptor.changelog),
        "plugin_dependencies" => Some(&mut descriptor.plugin_dependencies),
        "icon" => Some(&mut descriptor.icon),
        _ => None,
    }
}

fn flag_slot<'a>(descriptor: &'a mut PluginDescriptor, key: &str) -> Option<&'a mut bool> {
    match key {
        "hasProcessingProvider" => Some(&mut descriptor.has_processing_provider),
        "experimental" => Some(&mut descriptor.experimental),
        "deprecated" => Some(&mut descriptor.deprecated),
        "server" => Some(&mut descriptor.server),
        _ => None,
    }
}

fn required(general: &BTreeMap<String, String>, key: &str) -> DescriptorResult<String> {
    optional(general, key).ok_or_else(|| DescriptorError::MissingField {
        field: key.to_string(),
    })
}

fn optional(general: &BTreeMap<String, String>, key: &str) -> Option<String> {
    general
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::serializer::serialize;
    use std::collections::BTreeSet;

    const MINIMAL: &str = "[general]
name=EduAccess Mapper
qgisMinimumVersion=3.0
description=Analyze school distribution
version=0.1
author=EduAccess Mapper Developers
email=maintainers@example.org
";

    fn validate_text(text: &str) -> DescriptorResult<PluginDescriptor> {
        validate(&parse(text)?)
    }

    #[test]
    fn test_minimal_descriptor_defaults() {
        let descriptor = validate_text(MINIMAL).unwrap();
        assert_eq!(descriptor.name, "EduAccess Mapper");
        assert!(!descriptor.experimental);
        assert!(!descriptor.deprecated);
        assert!(!descriptor.server);
        assert!(!descriptor.has_processing_provider);
        assert!(descriptor.tags.is_empty());
        assert_eq!(descriptor.category, None);
        assert_eq!(descriptor.icon, None);
    }

    #[test]
    fn test_each_missing_mandatory_field_is_named() {
        for key in MANDATORY_FIELDS {
            let text: String = MINIMAL
                .lines()
                .filter(|line| !line.starts_with(&format!("{key}=")))
                .map(|line| format!("{line}\n"))
                .collect();

            let err = validate_text(&text).unwrap_err();
            assert_eq!(
                err,
                DescriptorError::MissingField {
                    field: key.to_string()
                },
                "{key}"
            );
        }
    }

    #[test]
    fn test_empty_mandatory_value_counts_as_missing() {
        let text = MINIMAL.replace("author=EduAccess Mapper Developers", "author=   ");
        let err = validate_text(&text).unwrap_err();
        assert_eq!(err.field(), Some("author"));
    }

    #[test]
    fn test_first_missing_field_in_fixed_order() {
        let err = validate_text("[general]\nversion=0.1\n").unwrap_err();
        assert_eq!(
            err,
            DescriptorError::MissingField {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn test_missing_general_section_reports_name() {
        let err = validate_text("[other]\nname=A\n").unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_mixed_boolean_encodings() {
        let text = format!(
            "{MINIMAL}hasProcessingProvider=Yes\nserver=no\nexperimental=TRUE\ndeprecated=False\n"
        );
        let descriptor = validate_text(&text).unwrap();
        assert!(descriptor.has_processing_provider);
        assert!(!descriptor.server);
        assert!(descriptor.experimental);
        assert!(!descriptor.deprecated);
    }

    #[test]
    fn test_invalid_boolean_names_field_and_value() {
        let text = format!("{MINIMAL}experimental=maybe\n");
        let err = validate_text(&text).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::InvalidBoolean {
                field: "experimental".to_string(),
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn test_tags_and_category() {
        let text = format!("{MINIMAL}tags=python, gis , education,\ncategory=Vector\n");
        let descriptor = validate_text(&text).unwrap();
        let expected: BTreeSet<String> = ["python", "gis", "education"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(descriptor.tags, expected);
        assert_eq!(descriptor.category, Some(Category::Vector));
    }

    #[test]
    fn test_unknown_keys_and_sections_are_preserved() {
        let text = format!("{MINIMAL}supportsQt6=yes\n[packaging]\nzip=true\n");
        let descriptor = validate_text(&text).unwrap();
        assert_eq!(
            descriptor.extra.get("supportsQt6").map(String::as_str),
            Some("yes")
        );
        assert_eq!(
            descriptor
                .extra_sections
                .get("packaging")
                .and_then(|entries| entries.get("zip"))
                .map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_every_known_key_is_typed() {
        let mut text = String::from("[general]\n");
        for spec in KNOWN_FIELDS {
            let value = match spec.kind {
                FieldKind::Text => format!("value of {}", spec.key),
                FieldKind::Flag => "yes".to_string(),
                FieldKind::Tags => "python".to_string(),
                FieldKind::Category => "Vector".to_string(),
            };
            text.push_str(&format!("{}={}\n", spec.key, value));
        }

        let descriptor = validate_text(&text).unwrap();
        assert!(descriptor.extra.is_empty(), "{:?}", descriptor.extra);
        assert!(descriptor.has_processing_provider && descriptor.server);
        assert!(descriptor.experimental && descriptor.deprecated);
        assert_eq!(descriptor.category, Some(Category::Vector));

        let written = serialize(&descriptor);
        for spec in KNOWN_FIELDS {
            assert!(written.contains(&format!("\n{}=", spec.key)), "{}", spec.key);
        }
        assert_eq!(validate_text(&written).unwrap(), descriptor);
    }

    #[test]
    fn test_schema_table_matches_mandatory_list() {
        let mandatory: Vec<&str> = KNOWN_FIELDS
            .iter()
            .filter(|spec| spec.mandatory)
            .map(|spec| spec.key)
            .collect();
        assert_eq!(mandatory, MANDATORY_FIELDS.to_vec());
        assert_eq!(field_spec("server").map(|spec| spec.kind), Some(FieldKind::Flag));
        assert!(!is_known_key("supportsQt6"));
    }
}
