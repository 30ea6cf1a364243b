//! Descriptor lint checks on top of the schema validator

use std::path::Path;

use tracing::warn;
use types::utils::{is_http_url, looks_like_email};
use types::PluginDescriptor;

/// Descriptor linter
pub struct DescriptorValidator;

impl DescriptorValidator {
    /// Lint a descriptor that already passed schema validation
    ///
    /// `icon_root` is the plugin package directory; when given, the icon path
    /// is resolved against it and checked on disk.
    pub fn validate(descriptor: &PluginDescriptor, icon_root: Option<&Path>) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_versions(descriptor, &mut report);
        Self::validate_links(descriptor, &mut report);
        Self::validate_registry_fields(descriptor, &mut report);
        Self::validate_icon(descriptor, icon_root, &mut report);
        Self::validate_flags(descriptor, &mut report);

        for issue in &report.warnings {
            warn!(field = %issue.field, "{}", issue.message);
        }

        report
    }

    fn validate_versions(descriptor: &PluginDescriptor, report: &mut ValidationReport) {
        let minimum = match descriptor.minimum_host_version() {
            Ok(version) => Some(version),
            Err(e) => {
                report.add_error("qgisMinimumVersion", &e.to_string());
                None
            }
        };

        match descriptor.maximum_host_version() {
            Ok(Some(maximum)) => {
                if let Some(minimum) = minimum {
                    if maximum < minimum {
                        report.add_error(
                            "qgisMaximumVersion",
                            &format!("Maximum host version {maximum} is lower than minimum {minimum}"),
                        );
                    }
                }
            }
            Ok(None) => {}
            Err(e) => report.add_error("qgisMaximumVersion", &e.to_string()),
        }

        if !descriptor
            .version
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            report.add_warning(
                "version",
                &format!("Plugin version '{}' is not a dotted version", descriptor.version),
            );
        }
    }

    fn validate_links(descriptor: &PluginDescriptor, report: &mut ValidationReport) {
        let links = [
            ("tracker", descriptor.tracker.as_deref()),
            ("repository", descriptor.repository.as_deref()),
            ("homepage", descriptor.homepage.as_deref()),
        ];

        for (field, value) in links {
            if let Some(url) = value {
                if !is_http_url(url) {
                    report.add_warning(field, &format!("'{url}' is not an http(s) URL"));
                }
            }
        }

        if !looks_like_email(&descriptor.email) {
            report.add_warning(
                "email",
                &format!("'{}' does not look like an e-mail address", descriptor.email),
            );
        }
    }

    fn validate_registry_fields(descriptor: &PluginDescriptor, report: &mut ValidationReport) {
        if descriptor.about.is_none() {
            report.add_warning("about", "No 'about' text, plugin repositories require one");
        }

        if descriptor.tags.is_empty() {
            report.add_warning("tags", "No tags, the plugin will be hard to find in the registry");
        }

        if let Some(category) = &descriptor.category {
            if !category.is_known() {
                report.add_warning(
                    "category",
                    &format!(
                        "Unknown category '{category}'. Known categories: Raster, Vector, Database, Web, Plugins"
                    ),
                );
            }
        }
    }

    fn validate_icon(
        descriptor: &PluginDescriptor,
        icon_root: Option<&Path>,
        report: &mut ValidationReport,
    ) {
        let Some(icon) = descriptor.icon.as_deref() else {
            report.add_warning("icon", "No icon declared, the host will show a placeholder");
            return;
        };

        if Path::new(icon).is_absolute() {
            report.add_warning("icon", "Icon path should be relative to the plugin directory");
        }

        if let Some(root) = icon_root {
            if !root.join(icon).is_file() {
                report.add_warning(
                    "icon",
                    &format!("Icon file '{}' not found under {}", icon, root.display()),
                );
            }
        }
    }

    fn validate_flags(descriptor: &PluginDescriptor, report: &mut ValidationReport) {
        if descriptor.experimental && descriptor.deprecated {
            report.add_warning(
                "deprecated",
                "Plugin is flagged both experimental and deprecated",
            );
        }
    }
}

/// Lint findings for one descriptor, split by severity
///
/// Errors mean the host would refuse or misread the plugin. Warnings are
/// registry-quality problems that only fail a strict run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A lint finding against one descriptor key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Key as written in `metadata.txt`
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem that makes the descriptor unusable
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(field, message));
    }

    /// Record a problem the host tolerates
    pub fn add_warning(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(field, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Whether the descriptor passes lint; `strict` also fails on warnings
    pub fn passes(&self, strict: bool) -> bool {
        self.is_valid() && !(strict && self.has_warnings())
    }

    /// One-line tally such as `Lint: 1 error, 2 warnings`
    pub fn summary(&self) -> String {
        let count = |n: usize, noun: &str| {
            if n == 1 {
                format!("{n} {noun}")
            } else {
                format!("{n} {noun}s")
            }
        };
        format!(
            "Lint: {}, {}",
            count(self.errors.len(), "error"),
            count(self.warnings.len(), "warning")
        )
    }
}
