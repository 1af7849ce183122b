// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the urlsplitter source filter.
//!
//! Provides TOML configuration parsing with strict validation, XDG file
//! hierarchy lookup, environment variable overrides, miette diagnostics with
//! typo suggestions, and conversion into the [`ParameterCollection`] plugins
//! are constructed with.
//!
//! # Usage
//!
//! ```no_run
//! use urlsplitter_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! let parameters = config.to_parameters();
//! println!("{} parameters", parameters.len());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use tracing::debug;
use urlsplitter_core::{ParameterCollection, ParameterValue};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SplitterConfig;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<SplitterConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<SplitterConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Layer caller overrides over the configured parameters.
///
/// Overrides win on conflict; the configuration's own collection is not touched.
pub fn layered_parameters(
    config: &SplitterConfig,
    overrides: &ParameterCollection,
) -> ParameterCollection {
    let mut parameters = config.to_parameters();
    parameters.merge(overrides, true);
    debug!(count = parameters.len(), "layered parameters");
    parameters
}

/// Parse a `NAME=VALUE` assignment.
///
/// `true`/`false` become flags, values parsing as `i64` become integers, and
/// everything else stays text.
pub fn parse_assignment(input: &str) -> Result<(String, ParameterValue), ConfigError> {
    let (name, value) = input
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| ConfigError::Assignment {
            input: input.to_string(),
        })?;

    let value = match value {
        "true" => ParameterValue::Boolean(true),
        "false" => ParameterValue::Boolean(false),
        other => other
            .parse::<i64>()
            .map(ParameterValue::Integer)
            .unwrap_or_else(|_| ParameterValue::Text(other.to_string())),
    };
    Ok((name.trim().to_string(), value))
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![std::path::PathBuf::from(loader::SYSTEM_CONFIG_PATH)];
    candidates.extend(loader::user_config_path());
    if let Ok(dir) = std::env::current_dir() {
        candidates.push(dir.join(loader::CONFIG_FILE_NAME));
    }

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
