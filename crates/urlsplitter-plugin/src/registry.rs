// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry for protocol and parser plugins.
//!
//! The `PluginRegistry` stores `PluginEntry` records keyed by plugin name.
//! Each entry contains a manifest, status, and optional factory. Factories
//! receive a configuration object, never another plugin's concrete type.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use urlsplitter_core::{
    ParameterCollection, ParseResult, ParserPlugin, ParserPluginConfiguration, PluginKind,
    ProtocolHoster, ProtocolPlugin, ProtocolPluginConfiguration, SplitterError,
};

use crate::manifest::PluginManifest;

/// Status of a plugin in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginStatus {
    /// Plugin is active and will be constructed.
    Enabled,
    /// Plugin is explicitly disabled by user.
    Disabled,
    /// Plugin is compiled in but missing required parameters.
    NotConfigured,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginStatus::Enabled => write!(f, "enabled"),
            PluginStatus::Disabled => write!(f, "disabled"),
            PluginStatus::NotConfigured => write!(f, "not-configured"),
        }
    }
}

/// Creates protocol plugins from their configuration.
pub trait ProtocolFactory: Send + Sync {
    fn create(
        &self,
        config: ProtocolPluginConfiguration,
    ) -> Result<Box<dyn ProtocolPlugin>, SplitterError>;
}

/// Creates parser plugins bound to the hoster in their configuration.
pub trait ParserFactory: Send + Sync {
    fn create<'h>(
        &self,
        config: ParserPluginConfiguration<'h>,
    ) -> Result<Box<dyn ParserPlugin + 'h>, SplitterError>;
}

/// Factory for one registry entry, matching the manifest's kind.
pub enum PluginFactory {
    Protocol(Box<dyn ProtocolFactory>),
    Parser(Box<dyn ParserFactory>),
}

impl PluginFactory {
    pub fn kind(&self) -> PluginKind {
        match self {
            PluginFactory::Protocol(_) => PluginKind::Protocol,
            PluginFactory::Parser(_) => PluginKind::Parser,
        }
    }
}

/// A single entry in the plugin registry.
pub struct PluginEntry {
    /// Plugin manifest with metadata.
    pub manifest: PluginManifest,
    /// Current status of the plugin.
    pub status: PluginStatus,
    /// Optional factory for creating plugin instances.
    pub factory: Option<PluginFactory>,
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("manifest", &self.manifest)
            .field("status", &self.status)
            .field("factory", &self.factory.as_ref().map(PluginFactory::kind))
            .finish()
    }
}

/// Registry of protocol and parser plugins.
pub struct PluginRegistry {
    entries: HashMap<String, PluginEntry>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a plugin with default status `Enabled`.
    pub fn register(&mut self, manifest: PluginManifest, factory: Option<PluginFactory>) {
        self.register_with_status(manifest, factory, PluginStatus::Enabled);
    }

    /// Register a plugin with an explicit status.
    ///
    /// A factory whose kind disagrees with the manifest is dropped.
    pub fn register_with_status(
        &mut self,
        manifest: PluginManifest,
        factory: Option<PluginFactory>,
        status: PluginStatus,
    ) {
        let factory = factory.filter(|f| {
            let matches = f.kind() == manifest.kind;
            if !matches {
                warn!(plugin = %manifest.name, "factory kind does not match manifest, ignoring factory");
            }
            matches
        });
        info!(plugin = %manifest.name, kind = %manifest.kind, %status, "registered plugin");
        let name = manifest.name.clone();
        self.entries.insert(
            name,
            PluginEntry {
                manifest,
                status,
                factory,
            },
        );
    }

    /// Get a plugin entry by name.
    pub fn get(&self, name: &str) -> Option<&PluginEntry> {
        self.entries.get(name)
    }

    /// Enabled plugins of the given kind, sorted by name.
    pub fn enabled(&self, kind: PluginKind) -> Vec<&PluginEntry> {
        let mut entries: Vec<&PluginEntry> = self
            .entries
            .values()
            .filter(|e| e.status == PluginStatus::Enabled && e.manifest.kind == kind)
            .collect();
        entries.sort_by(|a, b| a.manifest.name.cmp(&b.manifest.name));
        entries
    }

    /// List all plugin entries, sorted by name.
    pub fn list_all(&self) -> Vec<&PluginEntry> {
        let mut entries: Vec<&PluginEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.manifest.name.cmp(&b.manifest.name));
        entries
    }

    /// Toggle a plugin's enabled status.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), SplitterError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| SplitterError::PluginNotFound {
                kind: "unknown".to_string(),
                name: name.to_string(),
            })?;
        entry.status = if enabled {
            PluginStatus::Enabled
        } else {
            PluginStatus::Disabled
        };
        Ok(())
    }

    /// Mark every plugin whose required parameters are absent as `NotConfigured`,
    /// and restore `NotConfigured` plugins whose parameters are now present.
    pub fn refresh_status(&mut self, parameters: &ParameterCollection) {
        for entry in self.entries.values_mut() {
            let configured = parameters.require(&entry.manifest.required()).is_ok();
            match (&entry.status, configured) {
                (PluginStatus::Enabled, false) => {
                    debug!(plugin = %entry.manifest.name, "plugin not configured");
                    entry.status = PluginStatus::NotConfigured;
                }
                (PluginStatus::NotConfigured, true) => entry.status = PluginStatus::Enabled,
                _ => {}
            }
        }
    }

    /// Construct the named parser plugin against `hoster`.
    ///
    /// The parser's configuration takes ownership of `parameters`.
    pub fn create_parser<'h>(
        &self,
        name: &str,
        parameters: ParameterCollection,
        hoster: &'h dyn ProtocolHoster,
    ) -> Result<Box<dyn ParserPlugin + 'h>, SplitterError> {
        let entry = self.lookup(name, PluginKind::Parser)?;
        let Some(PluginFactory::Parser(factory)) = &entry.factory else {
            return Err(SplitterError::Configuration(format!(
                "parser plugin `{name}` has no factory"
            )));
        };

        let config = ParserPluginConfiguration::builder()
            .parameters(parameters)
            .protocol_hoster(hoster)
            .require(entry.manifest.required_parameters.iter().cloned())
            .build_parser()?;
        factory.create(config)
    }

    /// Construct the named protocol plugin.
    pub fn create_protocol(
        &self,
        name: &str,
        parameters: ParameterCollection,
    ) -> Result<Box<dyn ProtocolPlugin>, SplitterError> {
        let entry = self.lookup(name, PluginKind::Protocol)?;
        let Some(PluginFactory::Protocol(factory)) = &entry.factory else {
            return Err(SplitterError::Configuration(format!(
                "protocol plugin `{name}` has no factory"
            )));
        };

        let config = ProtocolPluginConfiguration::with_required(parameters, &entry.manifest.required())?;
        factory.create(config)
    }

    /// Construct every enabled protocol plugin, each with its own copy of `parameters`.
    ///
    /// Plugins that fail to construct are skipped.
    pub fn create_protocols(&self, parameters: &ParameterCollection) -> Vec<Box<dyn ProtocolPlugin>> {
        let mut protocols = Vec::new();
        for entry in self.enabled(PluginKind::Protocol) {
            if entry.factory.is_none() {
                continue;
            }
            match self.create_protocol(&entry.manifest.name, parameters.clone()) {
                Ok(protocol) => protocols.push(protocol),
                Err(e) => warn!(plugin = %entry.manifest.name, error = %e, "skipping protocol plugin"),
            }
        }
        protocols
    }

    /// Offer the stream to each enabled parser in name order and return the
    /// first one that recognises it.
    ///
    /// Each candidate gets its own copy of `parameters`. A parser that fails
    /// to parse is skipped like one that declines. Returns `Ok(None)` when no
    /// parser recognises the stream.
    pub async fn detect_parser<'h>(
        &self,
        parameters: &ParameterCollection,
        hoster: &'h dyn ProtocolHoster,
    ) -> Result<Option<Box<dyn ParserPlugin + 'h>>, SplitterError> {
        for entry in self.enabled(PluginKind::Parser) {
            if entry.factory.is_none() {
                continue;
            }
            let name = entry.manifest.name.as_str();
            let parser = match self.create_parser(name, parameters.clone(), hoster) {
                Ok(parser) => parser,
                Err(SplitterError::MissingParameter { name: missing }) => {
                    debug!(parser = name, missing = %missing, "parser skipped, parameter missing");
                    continue;
                }
                Err(e) => return Err(e),
            };

            match parser.parse().await {
                Ok(ParseResult::Recognized { streams }) => {
                    info!(parser = name, streams, "parser recognised stream");
                    return Ok(Some(parser));
                }
                Ok(result) => debug!(parser = name, ?result, "parser declined stream"),
                Err(e) => debug!(parser = name, error = %e, "parser failed, trying next"),
            }
        }
        Ok(None)
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, name: &str, kind: PluginKind) -> Result<&PluginEntry, SplitterError> {
        let not_found = || SplitterError::PluginNotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        };
        let entry = self.entries.get(name).ok_or_else(not_found)?;
        if entry.manifest.kind != kind {
            return Err(not_found());
        }
        if entry.status != PluginStatus::Enabled {
            return Err(SplitterError::Configuration(format!(
                "plugin `{name}` is {}",
                entry.status
            )));
        }
        Ok(entry)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use urlsplitter_core::parameters::names;

    fn test_manifest(name: &str, kind: PluginKind, required: &[&str]) -> PluginManifest {
        PluginManifest {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            description: format!("Test plugin {name}"),
            kind,
            author: None,
            schemes: vec!["http".to_string()],
            required_parameters: required.iter().map(|s| s.to_string()).collect(),
        }
    }

    struct NullHoster;

    #[async_trait]
    impl ProtocolHoster for NullHoster {
        async fn open(&self, _url: &str) -> Result<(), SplitterError> {
            Ok(())
        }
        async fn read(&self, _position: u64, _length: usize) -> Result<Vec<u8>, SplitterError> {
            Ok(b"<SmoothStreamingMedia>".to_vec())
        }
        async fn seek(&self, position: u64) -> Result<u64, SplitterError> {
            Ok(position)
        }
        async fn close(&self) -> Result<(), SplitterError> {
            Ok(())
        }
        async fn active_protocol(&self) -> Option<String> {
            None
        }
    }

    /// Parser recognising streams whose first bytes start with `marker`.
    struct PrefixParser<'h> {
        marker: &'static [u8],
        config: ParserPluginConfiguration<'h>,
    }

    #[async_trait]
    impl ParserPlugin for PrefixParser<'_> {
        fn name(&self) -> &str {
            "prefix"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        async fn parse(&self) -> Result<ParseResult, SplitterError> {
            let hoster = self.config.protocol_hoster();
            hoster
                .open(&self.config.parameters().get_string(names::URL, ""))
                .await?;
            let head = hoster.read(0, self.marker.len()).await?;
            Ok(if head.starts_with(self.marker) {
                ParseResult::Recognized { streams: 1 }
            } else {
                ParseResult::NotRecognized
            })
        }
    }

    struct PrefixFactory(&'static [u8]);

    impl ParserFactory for PrefixFactory {
        fn create<'h>(
            &self,
            config: ParserPluginConfiguration<'h>,
        ) -> Result<Box<dyn ParserPlugin + 'h>, SplitterError> {
            Ok(Box::new(PrefixParser {
                marker: self.0,
                config,
            }))
        }
    }

    struct BrokenParser;

    #[async_trait]
    impl ParserPlugin for BrokenParser {
        fn name(&self) -> &str {
            "broken"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        async fn parse(&self) -> Result<ParseResult, SplitterError> {
            Err(SplitterError::protocol("truncated header"))
        }
    }

    struct BrokenFactory;

    impl ParserFactory for BrokenFactory {
        fn create<'h>(
            &self,
            _config: ParserPluginConfiguration<'h>,
        ) -> Result<Box<dyn ParserPlugin + 'h>, SplitterError> {
            Ok(Box::new(BrokenParser))
        }
    }

    #[test]
    fn register_and_get_roundtrip() {
        let mut registry = PluginRegistry::new();
        registry.register(test_manifest("http", PluginKind::Protocol, &[]), None);

        let entry = registry.get("http").unwrap();
        assert_eq!(entry.manifest.name, "http");
        assert_eq!(entry.status, PluginStatus::Enabled);
    }

    #[test]
    fn enabled_filters_by_kind_and_status() {
        let mut registry = PluginRegistry::new();
        registry.register(test_manifest("http", PluginKind::Protocol, &[]), None);
        registry.register(test_manifest("f4m", PluginKind::Parser, &[]), None);
        registry.register_with_status(
            test_manifest("rtsp", PluginKind::Protocol, &[]),
            None,
            PluginStatus::Disabled,
        );

        let protocols = registry.enabled(PluginKind::Protocol);
        assert_eq!(protocols.len(), 1);
        assert_eq!(protocols[0].manifest.name, "http");

        let parsers = registry.enabled(PluginKind::Parser);
        assert_eq!(parsers.len(), 1);
        assert_eq!(parsers[0].manifest.name, "f4m");
    }

    #[test]
    fn set_enabled_toggles_status() {
        let mut registry = PluginRegistry::new();
        registry.register(test_manifest("http", PluginKind::Protocol, &[]), None);

        registry.set_enabled("http", false).unwrap();
        assert_eq!(registry.get("http").unwrap().status, PluginStatus::Disabled);

        registry.set_enabled("http", true).unwrap();
        assert_eq!(registry.get("http").unwrap().status, PluginStatus::Enabled);

        assert!(registry.set_enabled("nonexistent", true).is_err());
    }

    #[test]
    fn list_all_returns_sorted() {
        let mut registry = PluginRegistry::new();
        registry.register(test_manifest("udp", PluginKind::Protocol, &[]), None);
        registry.register(test_manifest("f4m", PluginKind::Parser, &[]), None);
        registry.register(test_manifest("mshs", PluginKind::Protocol, &[]), None);

        let names: Vec<&str> = registry
            .list_all()
            .iter()
            .map(|e| e.manifest.name.as_str())
            .collect();
        assert_eq!(names, vec!["f4m", "mshs", "udp"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn mismatched_factory_is_dropped() {
        let mut registry = PluginRegistry::new();
        registry.register(
            test_manifest("http", PluginKind::Protocol, &[]),
            Some(PluginFactory::Parser(Box::new(PrefixFactory(b"x")))),
        );
        assert!(registry.get("http").unwrap().factory.is_none());
    }

    #[test]
    fn refresh_status_tracks_required_parameters() {
        let mut registry = PluginRegistry::new();
        registry.register(
            test_manifest("mshs", PluginKind::Protocol, &[names::MSHS_MANIFEST]),
            None,
        );

        registry.refresh_status(&ParameterCollection::new());
        assert_eq!(registry.get("mshs").unwrap().status, PluginStatus::NotConfigured);

        let params: ParameterCollection = [(names::MSHS_MANIFEST, "http://m")].into_iter().collect();
        registry.refresh_status(&params);
        assert_eq!(registry.get("mshs").unwrap().status, PluginStatus::Enabled);
    }

    #[test]
    fn create_parser_checks_required_parameters() {
        let mut registry = PluginRegistry::new();
        registry.register(
            test_manifest("mshs-manifest", PluginKind::Parser, &[names::MSHS_MANIFEST]),
            Some(PluginFactory::Parser(Box::new(PrefixFactory(b"<")))),
        );
        let hoster = NullHoster;

        let err = registry
            .create_parser("mshs-manifest", ParameterCollection::new(), &hoster)
            .err()
            .unwrap();
        assert!(matches!(err, SplitterError::MissingParameter { .. }));

        let params: ParameterCollection = [(names::MSHS_MANIFEST, "http://m")].into_iter().collect();
        let parser = registry.create_parser("mshs-manifest", params, &hoster).unwrap();
        assert_eq!(parser.name(), "prefix");
    }

    #[test]
    fn create_parser_rejects_unknown_and_wrong_kind() {
        let mut registry = PluginRegistry::new();
        registry.register(test_manifest("http", PluginKind::Protocol, &[]), None);
        let hoster = NullHoster;

        let err = registry
            .create_parser("http", ParameterCollection::new(), &hoster)
            .err()
            .unwrap();
        assert!(matches!(err, SplitterError::PluginNotFound { .. }));

        let err = registry
            .create_parser("missing", ParameterCollection::new(), &hoster)
            .err()
            .unwrap();
        assert!(matches!(err, SplitterError::PluginNotFound { .. }));
    }

    #[tokio::test]
    async fn detect_parser_returns_first_recognising_parser() {
        let mut registry = PluginRegistry::new();
        registry.register(
            test_manifest("a-binary", PluginKind::Parser, &[]),
            Some(PluginFactory::Parser(Box::new(PrefixFactory(b"\x00\x01")))),
        );
        registry.register(
            test_manifest("b-needs-url", PluginKind::Parser, &[names::URL]),
            Some(PluginFactory::Parser(Box::new(PrefixFactory(b"<")))),
        );
        registry.register(
            test_manifest("c-smooth", PluginKind::Parser, &[]),
            Some(PluginFactory::Parser(Box::new(PrefixFactory(b"<Smooth")))),
        );
        let hoster = NullHoster;

        let parser = registry
            .detect_parser(&ParameterCollection::new(), &hoster)
            .await
            .unwrap();
        assert!(parser.is_some());

        registry.set_enabled("c-smooth", false).unwrap();
        let parser = registry
            .detect_parser(&ParameterCollection::new(), &hoster)
            .await
            .unwrap();
        assert!(parser.is_none());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn detect_parser_skips_failing_parser() {
        let mut registry = PluginRegistry::new();
        registry.register(
            test_manifest("a-broken", PluginKind::Parser, &[]),
            Some(PluginFactory::Parser(Box::new(BrokenFactory))),
        );
        registry.register(
            test_manifest("b-smooth", PluginKind::Parser, &[]),
            Some(PluginFactory::Parser(Box::new(PrefixFactory(b"<Smooth")))),
        );
        let hoster = NullHoster;

        let parser = registry
            .detect_parser(&ParameterCollection::new(), &hoster)
            .await
            .unwrap()
            .expect("second parser should be reached");
        assert_eq!(parser.name(), "prefix");
        assert!(logs_contain("parser failed, trying next"));
    }
}
