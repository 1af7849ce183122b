// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a registry of in-memory plugins, the hoster
//! owning the protocols, and the parameter collection everything was
//! configured from, the same way the filter wires them at startup.

use urlsplitter_config::SplitterConfig;
use urlsplitter_core::{
    ParameterCollection, ParameterValue, ParserPlugin, PluginKind, SplitterError,
};
use urlsplitter_plugin::{
    PluginFactory, PluginManifest, PluginProtocolHoster, PluginRegistry,
};

use crate::marker_parser::MarkerParserFactory;
use crate::memory_protocol::MemoryProtocolFactory;

fn manifest(name: &str, kind: PluginKind, schemes: &[&str], required: &[&str]) -> PluginManifest {
    PluginManifest {
        name: name.to_string(),
        version: "0.1.0".to_string(),
        description: format!("test {kind} {name}"),
        kind,
        author: None,
        schemes: schemes.iter().map(|s| s.to_string()).collect(),
        required_parameters: required.iter().map(|s| s.to_string()).collect(),
    }
}

/// Builder for creating test environments with configurable plugins.
pub struct TestHarnessBuilder {
    config: SplitterConfig,
    overrides: ParameterCollection,
    registry: PluginRegistry,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: SplitterConfig::default(),
            overrides: ParameterCollection::new(),
            registry: PluginRegistry::new(),
        }
    }

    /// Start from a loaded configuration instead of the defaults.
    pub fn with_config(mut self, config: SplitterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a parameter on top of the configuration.
    pub fn with_parameter(mut self, name: &str, value: impl Into<ParameterValue>) -> Self {
        self.overrides.set(name, value);
        self
    }

    /// Register an in-memory protocol serving `body` for `schemes`.
    pub fn with_protocol(
        mut self,
        name: &str,
        schemes: &[&str],
        required: &[&str],
        body: impl Into<Vec<u8>>,
    ) -> Self {
        self.registry.register(
            manifest(name, PluginKind::Protocol, schemes, required),
            Some(PluginFactory::Protocol(Box::new(MemoryProtocolFactory::new(
                name, schemes, body,
            )))),
        );
        self
    }

    /// Register a marker parser recognising streams starting with `marker`.
    pub fn with_parser(mut self, name: &str, marker: &[u8], required: &[&str]) -> Self {
        self.registry.register(
            manifest(name, PluginKind::Parser, &[], required),
            Some(PluginFactory::Parser(Box::new(MarkerParserFactory::new(
                name, marker,
            )))),
        );
        self
    }

    /// Build the harness: layer parameters, apply `plugins.disabled`, and
    /// construct the hoster.
    pub fn build(mut self) -> Result<TestHarness, SplitterError> {
        let parameters = urlsplitter_config::layered_parameters(&self.config, &self.overrides);
        for name in &self.config.plugins.disabled {
            self.registry.set_enabled(name, false)?;
        }
        let hoster = PluginProtocolHoster::from_registry(&self.registry, &parameters);
        Ok(TestHarness {
            registry: self.registry,
            hoster,
            parameters,
        })
    }
}

/// Wired registry, hoster, and parameters.
pub struct TestHarness {
    pub registry: PluginRegistry,
    pub hoster: PluginProtocolHoster,
    pub parameters: ParameterCollection,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Find the parser that recognises the configured stream.
    pub async fn detect(&self) -> Result<Option<Box<dyn ParserPlugin + '_>>, SplitterError> {
        self.registry
            .detect_parser(&self.parameters, &self.hoster)
            .await
    }

    /// Construct the named parser with a copy of the harness parameters.
    pub fn parser(&self, name: &str) -> Result<Box<dyn ParserPlugin + '_>, SplitterError> {
        self.registry
            .create_parser(name, self.parameters.clone(), &self.hoster)
    }
}
