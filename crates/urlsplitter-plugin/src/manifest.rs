// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing from `plugin.toml` files.
//!
//! A manifest names a protocol or parser plugin, the URL schemes it serves,
//! and the parameter names it cannot be constructed without.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use urlsplitter_core::{PluginKind, SplitterError};

/// Parsed plugin manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique name of the plugin (e.g., "http", "mshs").
    pub name: String,
    /// Semantic version string.
    pub version: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the plugin is a protocol or a parser.
    pub kind: PluginKind,
    /// Optional author identifier.
    pub author: Option<String>,
    /// URL schemes the plugin serves (e.g., ["http", "https"]).
    pub schemes: Vec<String>,
    /// Parameter names that must be present to construct the plugin.
    pub required_parameters: Vec<String>,
}

impl PluginManifest {
    /// Returns true if `url` uses one of this plugin's schemes.
    pub fn serves(&self, url: &str) -> bool {
        url.split_once("://")
            .map(|(scheme, _)| {
                self.schemes
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(scheme))
            })
            .unwrap_or(false)
    }

    /// Required parameter names as string slices.
    pub fn required(&self) -> Vec<&str> {
        self.required_parameters.iter().map(String::as_str).collect()
    }
}

/// Intermediate TOML deserialization struct for `plugin.toml`.
#[derive(Debug, Deserialize)]
struct PluginManifestFile {
    plugin: PluginSection,
}

/// The `[plugin]` section of a `plugin.toml` file.
#[derive(Debug, Deserialize)]
struct PluginSection {
    name: String,
    version: String,
    description: String,
    kind: String,
    author: Option<String>,
    #[serde(default)]
    schemes: Vec<String>,
    #[serde(default)]
    required_parameters: Vec<String>,
}

/// Parse a plugin manifest from TOML content.
///
/// Validates that `kind` is a valid `PluginKind` variant, the name is
/// non-empty, and the version is valid semver.
pub fn parse_plugin_manifest(toml_content: &str) -> Result<PluginManifest, SplitterError> {
    let file: PluginManifestFile = toml::from_str(toml_content)
        .map_err(|e| SplitterError::Configuration(format!("invalid plugin manifest: {e}")))?;

    let section = file.plugin;

    if section.name.is_empty() {
        return Err(SplitterError::Configuration(
            "plugin manifest: name must not be empty".to_string(),
        ));
    }

    if let Err(e) = semver::Version::parse(&section.version) {
        return Err(SplitterError::Configuration(format!(
            "plugin manifest: invalid version '{}': {e}",
            section.version
        )));
    }

    let kind = PluginKind::from_str(&section.kind).map_err(|_| {
        SplitterError::Configuration(format!(
            "plugin manifest: invalid kind '{}'. Expected one of: Protocol, Parser",
            section.kind
        ))
    })?;

    Ok(PluginManifest {
        name: section.name,
        version: section.version,
        description: section.description,
        kind,
        author: section.author,
        schemes: section.schemes,
        required_parameters: section.required_parameters,
    })
}
