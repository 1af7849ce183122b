// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `urlsplitter params` command implementation.
//!
//! Builds the parameter collection from the loaded configuration, layers the
//! `--set` overrides on top, and prints the result.

use tracing::{debug, info};
use urlsplitter_config::SplitterConfig;
use urlsplitter_core::{ParameterCollection, SplitterError};

/// Parse `NAME=VALUE` overrides into a collection. Every malformed
/// assignment is reported before failing.
fn parse_overrides(assignments: &[String]) -> Result<ParameterCollection, SplitterError> {
    let mut overrides = ParameterCollection::new();
    let mut errors = Vec::new();
    for assignment in assignments {
        match urlsplitter_config::parse_assignment(assignment) {
            Ok((name, value)) => overrides.set(name, value),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(overrides)
    } else {
        urlsplitter_config::render_errors(&errors);
        Err(SplitterError::Configuration(format!(
            "{} invalid --set assignment(s)",
            errors.len()
        )))
    }
}

/// Build the parameters the filter would hand to its plugins.
pub fn effective_parameters(
    config: &SplitterConfig,
    assignments: &[String],
) -> Result<ParameterCollection, SplitterError> {
    let overrides = parse_overrides(assignments)?;
    debug!(overrides = overrides.len(), "parsed --set assignments");
    Ok(urlsplitter_config::layered_parameters(config, &overrides))
}

/// Run the `urlsplitter params` command.
pub fn run_params(
    config: &SplitterConfig,
    assignments: &[String],
    json: bool,
) -> Result<(), SplitterError> {
    let parameters = effective_parameters(config, assignments)?;
    info!(count = parameters.len(), "effective parameters built");

    if json {
        let rendered = serde_json::to_string_pretty(&parameters)
            .map_err(|e| SplitterError::Internal(format!("failed to render parameters: {e}")))?;
        println!("{rendered}");
    } else if parameters.is_empty() {
        println!("(no parameters)");
    } else {
        for parameter in parameters.iter() {
            println!("{} = {}", parameter.name(), parameter.value());
        }
    }
    Ok(())
}
