// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates constraints serde attributes cannot express: URL shape, positive
//! timeouts, and settings that only make sense together.

use crate::diagnostic::ConfigError;
use crate::model::SplitterConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn has_scheme(url: &str) -> bool {
    url.split_once("://")
        .is_some_and(|(scheme, rest)| !scheme.is_empty() && !rest.is_empty())
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &SplitterConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        fail(format!(
            "logging.level `{}` must be one of: {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    let http = &config.http;
    if http.open_connection_timeout_ms == 0 {
        fail("http.open_connection_timeout_ms must be positive".to_string());
    }
    if http.total_reopen_connection_timeout_ms == 0 {
        fail("http.total_reopen_connection_timeout_ms must be positive".to_string());
    }
    if let Some(version) = &http.version
        && version != "1.0"
        && version != "1.1"
    {
        fail(format!("http.version `{version}` must be \"1.0\" or \"1.1\""));
    }
    if http.server_user_name.is_some() != http.server_password.is_some() {
        fail("http.server_user_name and http.server_password must be set together".to_string());
    }

    let mshs = &config.mshs;
    for (key, value) in [("mshs.base_url", &mshs.base_url), ("mshs.manifest", &mshs.manifest)] {
        if let Some(url) = value
            && !has_scheme(url)
        {
            fail(format!("{key} `{url}` is not an absolute URL"));
        }
    }
    if mshs.manifest.is_some() && mshs.base_url.is_none() {
        fail("mshs.manifest requires mshs.base_url".to_string());
    }

    for name in config.parameters.keys() {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            fail(format!("parameter name `{name}` must be non-empty without whitespace"));
        }
    }

    if config.plugins.disabled.iter().any(|name| name.trim().is_empty()) {
        fail("plugins.disabled must not contain empty names".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
