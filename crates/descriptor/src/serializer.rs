//! Canonical text rendering of a typed descriptor

use types::utils::{format_title_bool, format_yes_no, join_tags};
use types::PluginDescriptor;

use crate::parser::GENERAL_SECTION;
use crate::schema::{FieldKind, FieldSpec, KNOWN_FIELDS};

/// Render a descriptor back into `metadata.txt` form
///
/// Typed keys come first in schema order, then unrecognized `[general]`
/// keys, then any extra sections. Comments and the original key order are
/// not reproduced.
pub fn serialize(descriptor: &PluginDescriptor) -> String {
    let mut lines = vec![format!("[{GENERAL_SECTION}]")];

    for spec in KNOWN_FIELDS {
        if let Some(value) = render_field(descriptor, spec) {
            lines.push(format!("{}={}", spec.key, value));
        }
    }

    for (key, value) in &descriptor.extra {
        lines.push(format!("{key}={value}"));
    }

    for (section, entries) in &descriptor.extra_sections {
        lines.push(String::new());
        lines.push(format!("[{section}]"));
        for (key, value) in entries {
            lines.push(format!("{key}={value}"));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn render_field(descriptor: &PluginDescriptor, spec: &FieldSpec) -> Option<String> {
    match spec.kind {
        FieldKind::Text => text_field(descriptor, spec.key).map(str::to_string),
        FieldKind::Flag => flag_field(descriptor, spec.key).map(|value| {
            // Capability flags use yes/no, status flags True/False
            match spec.key {
                "hasProcessingProvider" | "server" => format_yes_no(value),
                _ => format_title_bool(value),
            }
            .to_string()
        }),
        FieldKind::Tags => (!descriptor.tags.is_empty()).then(|| join_tags(&descriptor.tags)),
        FieldKind::Category => descriptor
            .category
            .as_ref()
            .map(|category| category.as_str().to_string()),
    }
}

fn text_field<'a>(descriptor: &'a PluginDescriptor, key: &str) -> Option<&'a str> {
    match key {
        "name" => Some(&descriptor.name),
        "qgisMinimumVersion" => Some(&descriptor.qgis_minimum_version),
        "qgisMaximumVersion" => descriptor.qgis_maximum_version.as_deref(),
        "description" => Some(&descriptor.description),
        "version" => Some(&descriptor.version),
        "author" => Some(&descriptor.author),
        "email" => Some(&descriptor.email),
        "about" => descriptor.about.as_deref(),
        "tracker" => descriptor.tracker.as_deref(),
        "repository" => descriptor.repository.as_deref(),
        "homepage" => descriptor.homepage.as_deref(),
        "changelog" => descriptor.changelog.as_deref(),
        "plugin_dependencies" => descriptor.plugin_dependencies.as_deref(),
        "icon" => descriptor.icon.as_deref(),
        _ => None,
    }
}

fn flag_field(descriptor: &PluginDescriptor, key: &str) -> Option<bool> {
    match key {
        "hasProcessingProvider" => Some(descriptor.has_processing_provider),
        "experimental" => Some(descriptor.experimental),
        "deprecated" => Some(descriptor.deprecated),
        "server" => Some(descriptor.server),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::schema::validate;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, BTreeSet};
    use types::Category;

    fn full_descriptor() -> PluginDescriptor {
        let mut descriptor = PluginDescriptor::new(
            "EduAccess Mapper",
            "3.0",
            "Analyze school distribution",
            "0.1",
            "EduAccess Mapper Developers",
            "maintainers@example.org",
        );
        descriptor.qgis_maximum_version = Some("3.99".to_string());
        descriptor.about = Some("Counts schools per district".to_string());
        descriptor.homepage = Some("https://example.org/edu-access-mapper".to_string());
        descriptor.changelog = Some("0.1 first release".to_string());
        descriptor.tags = ["python", "education", "gis"]
            .into_iter()
            .map(String::from)
            .collect();
        descriptor.category = Some(Category::Other("Analysis".to_string()));
        descriptor.icon = Some("icon.png".to_string());
        descriptor.experimental = true;
        descriptor.has_processing_provider = true;
        descriptor
            .extra
            .insert("supportsQt6".to_string(), "yes".to_string());
        descriptor
            .extra_sections
            .entry("packaging".to_string())
            .or_default()
            .insert("zip".to_string(), "true".to_string());
        descriptor
    }

    #[test]
    fn test_serialize_then_validate_is_identity() {
        let minimal = PluginDescriptor::new("A", "3.0", "B", "1", "C", "c@example.org");
        for descriptor in [minimal, full_descriptor()] {
            let text = serialize(&descriptor);
            let back = validate(&parse(&text).unwrap()).unwrap();
            assert_eq!(back, descriptor, "{text}");
        }
    }

    #[test]
    fn test_flag_spellings() {
        let text = serialize(&full_descriptor());
        assert!(text.contains("hasProcessingProvider=yes\n"));
        assert!(text.contains("server=no\n"));
        assert!(text.contains("experimental=True\n"));
        assert!(text.contains("deprecated=False\n"));
    }

    #[test]
    fn test_layout() {
        let text = serialize(&full_descriptor());
        assert!(text.starts_with("[general]\nname=EduAccess Mapper\nqgisMinimumVersion=3.0\n"));
        assert!(text.contains("tags=education, gis, python\n"));
        assert!(text.contains("category=Analysis\n"));
        assert!(text.ends_with("\n[packaging]\nzip=true\n"));

        let minimal = serialize(&PluginDescriptor::new("A", "3.0", "B", "1", "C", "c@example.org"));
        assert!(!minimal.contains("tags="));
        assert!(!minimal.contains("icon="));
    }

    /// Single-line value with no surrounding whitespace
    fn value() -> impl Strategy<Value = String> {
        "[A-Za-z0-9]([A-Za-z0-9 .,:/@=#_-]{0,18}[A-Za-z0-9])?"
    }

    fn optional_value() -> impl Strategy<Value = Option<String>> {
        prop::option::of(value())
    }

    fn tags() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[a-z][a-z0-9 _-]{0,10}[a-z0-9]", 0..5)
    }

    fn category() -> impl Strategy<Value = Option<Category>> {
        prop::option::of(prop_oneof![
            Just(Category::Raster),
            Just(Category::Vector),
            Just(Category::Database),
            Just(Category::Web),
            Just(Category::Plugins),
            value().prop_map(|raw| Category::from_str(&raw)),
        ])
    }

    // Untyped keys start with `x`, which no typed key does
    fn extra() -> impl Strategy<Value = BTreeMap<String, String>> {
        prop::collection::btree_map("x[A-Za-z0-9_]{0,10}", value(), 0..4)
    }

    fn extra_sections() -> impl Strategy<Value = BTreeMap<String, BTreeMap<String, String>>> {
        prop::collection::btree_map(
            "[a-z][a-z0-9_]{0,10}".prop_filter("not the general section", |name| {
                name != GENERAL_SECTION
            }),
            prop::collection::btree_map("[A-Za-z][A-Za-z0-9_]{0,10}", value(), 0..3),
            0..3,
        )
    }

    fn any_descriptor() -> impl Strategy<Value = PluginDescriptor> {
        let mandatory = (value(), value(), value(), value(), value(), value());
        let links = (
            optional_value(),
            optional_value(),
            optional_value(),
            optional_value(),
            optional_value(),
            optional_value(),
            optional_value(),
            optional_value(),
        );
        let flags = any::<(bool, bool, bool, bool)>();
        let rest = (tags(), category(), extra(), extra_sections());

        (mandatory, links, flags, rest).prop_map(
            |(
                (name, minimum, description, version, author, email),
                (maximum, about, tracker, repository, homepage, changelog, dependencies, icon),
                (processing, experimental, deprecated, server),
                (tags, category, extra, extra_sections),
            )| {
                let mut descriptor =
                    PluginDescriptor::new(name, minimum, description, version, author, email);
                descriptor.qgis_maximum_version = maximum;
                descriptor.about = about;
                descriptor.tracker = tracker;
                descriptor.repository = repository;
                descriptor.homepage = homepage;
                descriptor.changelog = changelog;
                descriptor.plugin_dependencies = dependencies;
                descriptor.icon = icon;
                descriptor.has_processing_provider = processing;
                descriptor.experimental = experimental;
                descriptor.deprecated = deprecated;
                descriptor.server = server;
                descriptor.tags = tags;
                descriptor.category = category;
                descriptor.extra = extra;
                descriptor.extra_sections = extra_sections;
                descriptor
            },
        )
    }

    proptest! {
        #[test]
        fn prop_serialize_then_validate_is_identity(descriptor in any_descriptor()) {
            let text = serialize(&descriptor);
            let back = validate(&parse(&text).unwrap()).unwrap();
            prop_assert_eq!(back, descriptor, "{}", text);
        }
    }
}
