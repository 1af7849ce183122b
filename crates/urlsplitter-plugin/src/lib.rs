// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry, manifest parser, built-in catalog, and protocol hoster.
//!
//! Protocol and parser plugins are registered with a manifest describing
//! their URL schemes and required parameters. The registry builds them from
//! configuration objects; the hoster owns the protocols and is the only
//! route parsers have to the network.

pub mod catalog;
pub mod hoster;
pub mod manifest;
pub mod registry;

pub use catalog::{builtin_catalog, search_catalog};
pub use hoster::PluginProtocolHoster;
pub use manifest::{parse_plugin_manifest, PluginManifest};
pub use registry::{
    ParserFactory, PluginEntry, PluginFactory, PluginRegistry, PluginStatus, ProtocolFactory,
};
