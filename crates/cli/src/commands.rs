//! Command implementations
//!
//! Each command returns its printable output and whether it passed, so the
//! binary only decides where the text goes and which exit code to use.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use descriptor::{serialize, DescriptorLoader, DescriptorValidator, SAMPLE_METADATA};
use tracing::{info, warn};
use types::utils::{format_title_bool, format_yes_no};
use types::{HostVersion, PluginDescriptor};

/// Result of running a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn passed(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

fn load(path: &Path) -> Result<PluginDescriptor> {
    DescriptorLoader::load(path)
        .with_context(|| format!("Failed to load descriptor {}", path.display()))
}

fn parse_host_version(raw: &str) -> Result<HostVersion> {
    HostVersion::parse("host version", raw).context("Invalid host version")
}

/// Parse, validate and lint a descriptor
pub fn validate(path: &Path, host_version: Option<&str>, strict: bool) -> Result<CommandOutput> {
    let descriptor = load(path)?;
    let report = DescriptorValidator::validate(&descriptor, path.parent());

    let mut lines = Vec::new();
    for issue in &report.errors {
        lines.push(format!("error: {}: {}", issue.field, issue.message));
    }
    for issue in &report.warnings {
        lines.push(format!("warning: {}: {}", issue.field, issue.message));
    }

    let mut success = report.passes(strict);

    if let Some(raw) = host_version {
        let host = parse_host_version(raw)?;
        match descriptor.is_compatible_with(&host) {
            Ok(true) => lines.push(format!("host {host}: compatible")),
            Ok(false) => {
                lines.push(format!("error: host {host}: incompatible"));
                success = false;
            }
            // Already reported by the lint pass
            Err(_) => success = false,
        }
    }

    lines.push(report.summary());
    lines.push(format!(
        "{} {} {}",
        descriptor.name,
        descriptor.version,
        if success { "OK" } else { "FAILED" }
    ));

    info!(path = %path.display(), success, "Validated descriptor");

    Ok(CommandOutput {
        text: lines.join("\n"),
        success,
    })
}

/// Print the typed descriptor
pub fn show(path: &Path, format: OutputFormat) -> Result<CommandOutput> {
    let descriptor = load(path)?;

    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&descriptor)
            .context("Failed to serialize descriptor as JSON")?,
        OutputFormat::Yaml => {
            serde_yaml::to_string(&descriptor).context("Failed to serialize descriptor as YAML")?
        }
        OutputFormat::Text => render_text(&descriptor),
    };

    Ok(CommandOutput::passed(text))
}

fn render_text(descriptor: &PluginDescriptor) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let tags = descriptor.tags.iter().cloned().collect::<Vec<_>>().join(", ");

    let mut lines = vec![
        format!("{} {}", descriptor.name, descriptor.version),
        format!("  {}", descriptor.description),
        format!("author:        {} <{}>", descriptor.author, descriptor.email),
        format!(
            "host versions: {} .. {}",
            descriptor.qgis_minimum_version,
            descriptor
                .qgis_maximum_version
                .as_deref()
                .unwrap_or("any")
        ),
        format!(
            "category:      {}",
            descriptor
                .category
                .as_ref()
                .map(|category| category.to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
        format!("tags:          {}", if tags.is_empty() { "-" } else { tags.as_str() }),
        format!("icon:          {}", optional(&descriptor.icon)),
        format!("homepage:      {}", optional(&descriptor.homepage)),
        format!("repository:    {}", optional(&descriptor.repository)),
        format!("tracker:       {}", optional(&descriptor.tracker)),
        format!("processing:    {}", format_yes_no(descriptor.has_processing_provider)),
        format!("server:        {}", format_yes_no(descriptor.server)),
        format!("experimental:  {}", format_title_bool(descriptor.experimental)),
        format!("deprecated:    {}", format_title_bool(descriptor.deprecated)),
    ];

    for (key, value) in &descriptor.extra {
        lines.push(format!("{key} (untyped): {value}"));
    }

    lines.join("\n")
}

/// Print or write the canonical form of a descriptor
pub fn normalize(path: &Path, output: Option<&Path>) -> Result<CommandOutput> {
    let descriptor = load(path)?;

    match output {
        Some(output) => {
            DescriptorLoader::save(&descriptor, output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            Ok(CommandOutput::passed(format!(
                "Wrote normalized descriptor to {}",
                output.display()
            )))
        }
        None => Ok(CommandOutput::passed(
            serialize(&descriptor).trim_end().to_string(),
        )),
    }
}

/// Write the sample descriptor
pub fn init(path: &Path, force: bool) -> Result<CommandOutput> {
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }

    if path.exists() {
        warn!(path = %path.display(), "Overwriting existing descriptor");
    }

    DescriptorLoader::create_example(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(CommandOutput::passed(format!(
        "Wrote sample descriptor to {} ({} lines)",
        path.display(),
        SAMPLE_METADATA.lines().count()
    )))
}

/// Report whether a host version would load the plugin
pub fn check_host(path: &Path, host_version: &str) -> Result<CommandOutput> {
    let descriptor = load(path)?;
    let host = parse_host_version(host_version)?;

    let compatible = descriptor
        .is_compatible_with(&host)
        .context("Descriptor declares an unusable host version")?;

    let range = match &descriptor.qgis_maximum_version {
        Some(maximum) => format!("{} .. {}", descriptor.qgis_minimum_version, maximum),
        None => format!(">= {}", descriptor.qgis_minimum_version),
    };

    let text = format!(
        "{} {} on host {}: {} (requires {}; server: {})",
        descriptor.name,
        descriptor.version,
        host,
        if compatible { "compatible" } else { "incompatible" },
        range,
        format_yes_no(descriptor.server_compatible())
    );

    Ok(CommandOutput {
        text,
        success: compatible,
    })
}
