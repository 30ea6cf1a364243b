//! Plugin descriptor types

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorResult;
use crate::version::HostVersion;

/// Registry grouping declared by the `category` key
///
/// The host does not enforce the set, so unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Raster,
    Vector,
    Database,
    Web,
    Plugins,
    Other(String),
}

impl Category {
    /// Parse a category, falling back to `Other` for unknown names
    pub fn from_str(s: &str) -> Self {
        match s.trim() {
            "Raster" => Category::Raster,
            "Vector" => Category::Vector,
            "Database" => Category::Database,
            "Web" => Category::Web,
            "Plugins" => Category::Plugins,
            other => Category::Other(other.to_string()),
        }
    }

    /// Convert the category back to the text written in the descriptor
    pub fn as_str(&self) -> &str {
        match self {
            Category::Raster => "Raster",
            Category::Vector => "Vector",
            Category::Database => "Database",
            Category::Web => "Web",
            Category::Plugins => "Plugins",
            Category::Other(raw) => raw,
        }
    }

    /// Whether the host's plugin manager knows this grouping
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_str(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of a plugin's `metadata.txt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    /// Human-readable plugin title
    pub name: String,
    /// Lowest host version able to load the plugin
    pub qgis_minimum_version: String,
    /// Highest host version able to load the plugin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qgis_maximum_version: Option<String>,
    /// Short description shown in the plugin manager
    pub description: String,
    /// Plugin version, free form
    pub version: String,
    pub author: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    /// Comma separated list of plugins to install alongside this one
    #[serde(
        default,
        rename = "plugin_dependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub plugin_dependencies: Option<String>,
    /// Plugin registers a processing algorithm provider
    #[serde(default)]
    pub has_processing_provider: bool,
    /// Registry search keywords
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Icon path relative to the plugin package root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub deprecated: bool,
    /// Plugin can run on the headless server host
    #[serde(default)]
    pub server: bool,
    /// Unrecognized `[general]` keys, kept verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    /// Sections other than `[general]`, kept verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl PluginDescriptor {
    /// Create a descriptor holding only the mandatory fields
    pub fn new(
        name: impl Into<String>,
        qgis_minimum_version: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        author: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            qgis_minimum_version: qgis_minimum_version.into(),
            qgis_maximum_version: None,
            description: description.into(),
            version: version.into(),
            author: author.into(),
            email: email.into(),
            about: None,
            tracker: None,
            repository: None,
            homepage: None,
            changelog: None,
            plugin_dependencies: None,
            has_processing_provider: false,
            tags: BTreeSet::new(),
            category: None,
            icon: None,
            experimental: false,
            deprecated: false,
            server: false,
            extra: BTreeMap::new(),
            extra_sections: BTreeMap::new(),
        }
    }

    /// Parsed `qgisMinimumVersion`
    pub fn minimum_host_version(&self) -> DescriptorResult<HostVersion> {
        HostVersion::parse("qgisMinimumVersion", &self.qgis_minimum_version)
    }

    /// Parsed `qgisMaximumVersion`, if declared
    pub fn maximum_host_version(&self) -> DescriptorResult<Option<HostVersion>> {
        self.qgis_maximum_version
            .as_deref()
            .map(|raw| HostVersion::parse("qgisMaximumVersion", raw))
            .transpose()
    }

    /// Whether a host of the given version would load this plugin
    pub fn is_compatible_with(&self, host: &HostVersion) -> DescriptorResult<bool> {
        if *host < self.minimum_host_version()? {
            return Ok(false);
        }

        if let Some(maximum) = self.maximum_host_version()? {
            if *host > maximum {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Whether the plugin declares support for the server host variant
    pub fn server_compatible(&self) -> bool {
        self.server
    }
}
