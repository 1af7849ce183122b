// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./urlsplitter.toml` > `~/.config/urlsplitter/urlsplitter.toml`
//! > `/etc/urlsplitter/urlsplitter.toml`, with environment variable overrides
//! via the `URLSPLITTER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SplitterConfig;

/// File name looked up in each configuration directory.
pub const CONFIG_FILE_NAME: &str = "urlsplitter.toml";

/// System-wide configuration path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/urlsplitter/urlsplitter.toml";

/// Per-user configuration path under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("urlsplitter").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/urlsplitter/urlsplitter.toml` (system-wide)
/// 3. `~/.config/urlsplitter/urlsplitter.toml` (user XDG config)
/// 4. `./urlsplitter.toml` (local directory)
/// 5. `URLSPLITTER_*` environment variables
pub fn load_config() -> Result<SplitterConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SplitterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SplitterConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SplitterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SplitterConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SplitterConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Environment provider mapping `URLSPLITTER_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `URLSPLITTER_HTTP_USER_AGENT` must map to `http.user_agent`.
/// Keys reach the closure in their original case. The free-form
/// `[parameters]` table is not reachable from the environment since
/// parameter names are case-sensitive.
fn env_provider() -> Env {
    Env::prefixed("URLSPLITTER_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = ["logging", "http", "mshs", "plugins"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or(key_str);
        mapped.into()
    })
}
