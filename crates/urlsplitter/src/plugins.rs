// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `urlsplitter plugins` command implementation.

use serde::Serialize;
use tracing::debug;
use urlsplitter_config::SplitterConfig;
use urlsplitter_plugin::{builtin_catalog, search_catalog, PluginManifest};

/// Catalog entry annotated with the configured state.
#[derive(Debug, Serialize)]
pub struct PluginListing {
    #[serde(flatten)]
    pub manifest: PluginManifest,
    pub disabled: bool,
}

/// Catalog entries matching `query` (all of them when `None`).
pub fn listings(config: &SplitterConfig, query: Option<&str>) -> Vec<PluginListing> {
    let manifests = match query {
        Some(query) => search_catalog(query),
        None => builtin_catalog(),
    };
    manifests
        .into_iter()
        .map(|manifest| PluginListing {
            disabled: config.plugins.disabled.contains(&manifest.name),
            manifest,
        })
        .collect()
}

/// Run the `urlsplitter plugins` command.
pub fn run_plugins(config: &SplitterConfig, query: Option<&str>, json: bool) {
    let listings = listings(config, query);
    debug!(query = ?query, matches = listings.len(), "catalog searched");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&listings).unwrap_or_else(|_| "[]".to_string())
        );
        return;
    }

    if listings.is_empty() {
        println!("No plugins match.");
        return;
    }
    for listing in &listings {
        let m = &listing.manifest;
        let state = if listing.disabled { " [disabled]" } else { "" };
        println!("{:<14} {:<9} {}{}", m.name, m.kind.to_string(), m.description, state);
        if !m.required_parameters.is_empty() {
            println!("{:<24} requires: {}", "", m.required_parameters.join(", "));
        }
    }
}
