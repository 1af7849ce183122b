// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the urlsplitter filter.
//!
//! Typed sections use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! keys at startup. The free-form `[parameters]` table is passed through to
//! plugins unchanged; plugins ignore names they do not know.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use urlsplitter_core::parameters::names;
use urlsplitter_core::{ParameterCollection, ParameterValue};

/// Top-level urlsplitter configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SplitterConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// HTTP protocol settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Smooth-streaming protocol settings.
    #[serde(default)]
    pub mshs: MshsConfig,

    /// Plugin selection.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Extra parameters passed verbatim to plugins.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

impl SplitterConfig {
    /// Build the parameter collection plugins are configured with.
    ///
    /// Typed sections are applied first; entries of `[parameters]` override
    /// them on conflict.
    pub fn to_parameters(&self) -> ParameterCollection {
        let mut parameters = self.http.to_parameters();
        parameters.merge(&self.mshs.to_parameters(), true);

        let extra: ParameterCollection = self
            .parameters
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        parameters.merge(&extra, true);
        parameters
    }
}

/// Scalar accepted where text is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

/// Deserialize optional text, accepting bare scalars.
///
/// Environment values are parsed before extraction, so a cookie of `12345`
/// or a version of `1.1` arrives as a number.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Signed(i) => i.to_string(),
        Scalar::Unsigned(u) => u.to_string(),
        Scalar::Float(f) => format!("{f:?}"),
    }))
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP protocol configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    #[serde(default, deserialize_with = "optional_text")]
    pub user_agent: Option<String>,

    #[serde(default, deserialize_with = "optional_text")]
    pub referer: Option<String>,

    #[serde(default, deserialize_with = "optional_text")]
    pub cookie: Option<String>,

    /// Forced HTTP version ("1.0" or "1.1"). Negotiated when unset.
    #[serde(default, deserialize_with = "optional_text")]
    pub version: Option<String>,

    /// Ignore the Content-Length header sent by the server.
    #[serde(default)]
    pub ignore_content_length: bool,

    /// Milliseconds allowed for the first connection attempt.
    #[serde(default = "default_open_connection_timeout_ms")]
    pub open_connection_timeout_ms: u32,

    /// Milliseconds to wait between connection attempts.
    #[serde(default)]
    pub open_connection_sleep_time_ms: u32,

    /// Milliseconds allowed for reconnecting after a dropped stream.
    #[serde(default = "default_total_reopen_connection_timeout_ms")]
    pub total_reopen_connection_timeout_ms: u32,

    /// User name for server authentication.
    #[serde(default, deserialize_with = "optional_text")]
    pub server_user_name: Option<String>,

    /// Password for server authentication.
    #[serde(default, deserialize_with = "optional_text")]
    pub server_password: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            referer: None,
            cookie: None,
            version: None,
            ignore_content_length: false,
            open_connection_timeout_ms: default_open_connection_timeout_ms(),
            open_connection_sleep_time_ms: 0,
            total_reopen_connection_timeout_ms: default_total_reopen_connection_timeout_ms(),
            server_user_name: None,
            server_password: None,
        }
    }
}

fn default_open_connection_timeout_ms() -> u32 {
    20_000
}

fn default_total_reopen_connection_timeout_ms() -> u32 {
    60_000
}

impl HttpConfig {
    fn to_parameters(&self) -> ParameterCollection {
        let mut parameters = ParameterCollection::new();
        let optional = [
            (names::HTTP_USER_AGENT, &self.user_agent),
            (names::HTTP_REFERER, &self.referer),
            (names::HTTP_COOKIE, &self.cookie),
            (names::HTTP_VERSION, &self.version),
            (names::HTTP_SERVER_USER_NAME, &self.server_user_name),
            (names::HTTP_SERVER_PASSWORD, &self.server_password),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                parameters.set(name, value.as_str());
            }
        }

        parameters.set(names::HTTP_IGNORE_CONTENT_LENGTH, self.ignore_content_length);
        parameters.set(names::HTTP_OPEN_CONNECTION_TIMEOUT, self.open_connection_timeout_ms);
        parameters.set(
            names::HTTP_OPEN_CONNECTION_SLEEP_TIME,
            self.open_connection_sleep_time_ms,
        );
        parameters.set(
            names::HTTP_TOTAL_REOPEN_CONNECTION_TIMEOUT,
            self.total_reopen_connection_timeout_ms,
        );
        if self.server_user_name.is_some() {
            parameters.set(names::HTTP_SERVER_AUTHENTICATE, true);
        }
        parameters
    }
}

/// Smooth-streaming protocol configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MshsConfig {
    /// Base URL that fragment URLs are resolved against.
    #[serde(default, deserialize_with = "optional_text")]
    pub base_url: Option<String>,

    /// Client manifest URL.
    #[serde(default, deserialize_with = "optional_text")]
    pub manifest: Option<String>,
}

impl MshsConfig {
    fn to_parameters(&self) -> ParameterCollection {
        let mut parameters = ParameterCollection::new();
        if let Some(base_url) = &self.base_url {
            parameters.set(names::MSHS_BASE_URL, base_url.as_str());
        }
        if let Some(manifest) = &self.manifest {
            parameters.set(names::MSHS_MANIFEST, manifest.as_str());
        }
        parameters
    }
}

/// Plugin selection configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Names of registered plugins that must not be constructed.
    #[serde(default)]
    pub disabled: Vec<String>,
}
