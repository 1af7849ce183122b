// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in plugin catalog.
//!
//! Returns hardcoded `PluginManifest` entries for the protocols and parsers
//! the filter knows about. No network calls are made.

use urlsplitter_core::parameters::names;
use urlsplitter_core::PluginKind;

use crate::manifest::PluginManifest;

fn entry(
    name: &str,
    description: &str,
    kind: PluginKind,
    schemes: &[&str],
    required: &[&str],
) -> PluginManifest {
    PluginManifest {
        name: name.to_string(),
        version: "0.1.0".to_string(),
        description: description.to_string(),
        kind,
        author: Some("urlsplitter Contributors".to_string()),
        schemes: schemes.iter().map(|s| s.to_string()).collect(),
        required_parameters: required.iter().map(|s| s.to_string()).collect(),
    }
}

/// Returns manifests for all built-in plugins.
pub fn builtin_catalog() -> Vec<PluginManifest> {
    vec![
        entry(
            "http",
            "HTTP/1.x progressive download",
            PluginKind::Protocol,
            &["http", "https"],
            &[],
        ),
        entry(
            "mshs",
            "Microsoft smooth streaming fragment fetcher",
            PluginKind::Protocol,
            &["http", "https"],
            &[names::MSHS_BASE_URL, names::MSHS_MANIFEST],
        ),
        entry(
            "rtmp",
            "RTMP live and on-demand streams",
            PluginKind::Protocol,
            &["rtmp", "rtmpt", "rtmpe", "rtmps"],
            &[],
        ),
        entry(
            "rtsp",
            "RTSP session with RTP transport",
            PluginKind::Protocol,
            &["rtsp"],
            &[],
        ),
        entry(
            "udp",
            "UDP and RTP multicast reception",
            PluginKind::Protocol,
            &["udp", "rtp"],
            &[],
        ),
        entry(
            "file",
            "Local file access",
            PluginKind::Protocol,
            &["file"],
            &[],
        ),
        entry(
            "mshs-manifest",
            "Smooth streaming client manifest parser",
            PluginKind::Parser,
            &[],
            &[names::MSHS_MANIFEST],
        ),
        entry(
            "f4m",
            "Adobe HTTP dynamic streaming manifest parser",
            PluginKind::Parser,
            &[],
            &[],
        ),
        entry(
            "m3u8",
            "HTTP live streaming playlist parser",
            PluginKind::Parser,
            &[],
            &[],
        ),
    ]
}

/// Search the built-in catalog by name or description (case-insensitive).
pub fn search_catalog(query: &str) -> Vec<PluginManifest> {
    let query_lower = query.to_lowercase();
    builtin_catalog()
        .into_iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&query_lower)
                || m.description.to_lowercase().contains(&query_lower)
        })
        .collect()
}
