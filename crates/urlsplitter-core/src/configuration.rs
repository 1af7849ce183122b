// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration objects handed to plugins at construction time.
//!
//! A configuration takes ownership of the [`ParameterCollection`] it is built
//! with. Callers that want to keep their own copy clone it first; later edits
//! to that copy never reach the configuration.
//!
//! Parser configurations additionally borrow the [`ProtocolHoster`]. The
//! borrow ties every configuration, and every plugin built from one, to the
//! hoster's lifetime.

use std::fmt;
use std::ops::Deref;

use crate::error::SplitterError;
use crate::parameters::{ParameterCollection, ParameterValue};
use crate::traits::ProtocolHoster;

/// Parameters plus a non-owning reference to the protocol hoster.
#[derive(Clone)]
pub struct PluginConfiguration<'h> {
    parameters: ParameterCollection,
    hoster: &'h dyn ProtocolHoster,
}

impl<'h> PluginConfiguration<'h> {
    /// Start building a configuration.
    pub fn builder() -> PluginConfigurationBuilder<'h> {
        PluginConfigurationBuilder::default()
    }

    /// Build a configuration from parts that are both present.
    pub fn new(parameters: ParameterCollection, hoster: &'h dyn ProtocolHoster) -> Self {
        Self { parameters, hoster }
    }

    pub fn parameters(&self) -> &ParameterCollection {
        &self.parameters
    }

    /// The hoster all protocol I/O goes through.
    pub fn protocol_hoster(&self) -> &'h dyn ProtocolHoster {
        self.hoster
    }

    /// Forward a `set` to the owned parameter collection.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.parameters.set(name, value);
    }

    /// Give the parameters back, dropping the hoster reference.
    pub fn into_parameters(self) -> ParameterCollection {
        self.parameters
    }
}

impl fmt::Debug for PluginConfiguration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginConfiguration")
            .field("parameters", &self.parameters)
            .field("hoster", &"<borrowed>")
            .finish()
    }
}

/// Configuration handed to a stream-format parser plugin.
///
/// Carries nothing beyond [`PluginConfiguration`] today; format-specific
/// fields belong here rather than on the base type.
#[derive(Debug, Clone)]
pub struct ParserPluginConfiguration<'h>(PluginConfiguration<'h>);

impl<'h> ParserPluginConfiguration<'h> {
    /// Start building a parser configuration.
    pub fn builder() -> PluginConfigurationBuilder<'h> {
        PluginConfigurationBuilder::default()
    }

    pub fn new(parameters: ParameterCollection, hoster: &'h dyn ProtocolHoster) -> Self {
        Self(PluginConfiguration::new(parameters, hoster))
    }

    pub fn into_inner(self) -> PluginConfiguration<'h> {
        self.0
    }
}

impl<'h> Deref for ParserPluginConfiguration<'h> {
    type Target = PluginConfiguration<'h>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'h> From<PluginConfiguration<'h>> for ParserPluginConfiguration<'h> {
    fn from(configuration: PluginConfiguration<'h>) -> Self {
        Self(configuration)
    }
}

/// Configuration handed to a protocol plugin.
///
/// Protocol plugins are owned by the hoster, so they carry parameters only.
#[derive(Debug, Clone, Default)]
pub struct ProtocolPluginConfiguration {
    parameters: ParameterCollection,
}

impl ProtocolPluginConfiguration {
    pub fn new(parameters: ParameterCollection) -> Self {
        Self { parameters }
    }

    /// Build a configuration, checking that every `required` name is present.
    pub fn with_required(
        parameters: ParameterCollection,
        required: &[&str],
    ) -> Result<Self, SplitterError> {
        parameters.require(required)?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &ParameterCollection {
        &self.parameters
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.parameters.set(name, value);
    }
}

/// Fallible construction of plugin configurations.
///
/// `build` fails when the parameters or the hoster were never supplied, or
/// when a required parameter name is missing.
#[derive(Default)]
pub struct PluginConfigurationBuilder<'h> {
    parameters: Option<ParameterCollection>,
    hoster: Option<&'h dyn ProtocolHoster>,
    required: Vec<String>,
}

impl<'h> PluginConfigurationBuilder<'h> {
    /// Hand over the parameter collection. Ownership moves to the configuration.
    pub fn parameters(mut self, parameters: ParameterCollection) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn protocol_hoster(mut self, hoster: &'h dyn ProtocolHoster) -> Self {
        self.hoster = Some(hoster);
        self
    }

    /// Parameter names that must be present for `build` to succeed.
    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<PluginConfiguration<'h>, SplitterError> {
        let parameters = self.parameters.ok_or_else(|| {
            SplitterError::Configuration("plugin configuration requires parameters".to_string())
        })?;
        let hoster = self.hoster.ok_or_else(|| {
            SplitterError::Configuration(
                "plugin configuration requires a protocol hoster".to_string(),
            )
        })?;

        let required: Vec<&str> = self.required.iter().map(String::as_str).collect();
        parameters.require(&required)?;

        Ok(PluginConfiguration { parameters, hoster })
    }

    pub fn build_parser(self) -> Result<ParserPluginConfiguration<'h>, SplitterError> {
        self.build().map(ParserPluginConfiguration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::names;
    use async_trait::async_trait;

    struct NullHoster;

    #[async_trait]
    impl ProtocolHoster for NullHoster {
        async fn open(&self, _url: &str) -> Result<(), SplitterError> {
            Ok(())
        }

        async fn read(&self, _position: u64, _length: usize) -> Result<Vec<u8>, SplitterError> {
            Ok(Vec::new())
        }

        async fn seek(&self, position: u64) -> Result<u64, SplitterError> {
            Ok(position)
        }

        async fn close(&self) -> Result<(), SplitterError> {
            Ok(())
        }

        async fn active_protocol(&self) -> Option<String> {
            Some("null".to_string())
        }
    }

    fn mshs_parameters() -> ParameterCollection {
        [
            (names::MSHS_BASE_URL, "http://example/base"),
            (names::MSHS_MANIFEST, "http://example/manifest.ismc"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn missing_parameters_fail_construction() {
        let hoster = NullHoster;
        let result = ParserPluginConfiguration::builder()
            .protocol_hoster(&hoster)
            .build_parser();
        assert!(matches!(result, Err(SplitterError::Configuration(_))));
    }

    #[test]
    fn missing_hoster_fails_construction() {
        let result = ParserPluginConfiguration::builder()
            .parameters(mshs_parameters())
            .build_parser();
        assert!(matches!(result, Err(SplitterError::Configuration(_))));
    }

    #[test]
    fn missing_required_parameter_fails_construction() {
        let hoster = NullHoster;
        let result = ParserPluginConfiguration::builder()
            .parameters(mshs_parameters())
            .protocol_hoster(&hoster)
            .require([names::MSHS_MANIFEST, names::URL])
            .build_parser();
        match result {
            Err(SplitterError::MissingParameter { name }) => assert_eq!(name, names::URL),
            other => panic!("expected MissingParameter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn parser_configuration_exposes_parameters_and_hoster() {
        let hoster = NullHoster;
        let config = ParserPluginConfiguration::builder()
            .parameters(mshs_parameters())
            .protocol_hoster(&hoster)
            .require([names::MSHS_MANIFEST])
            .build_parser()
            .unwrap();

        assert_eq!(
            config.parameters().get_string(names::MSHS_MANIFEST, ""),
            "http://example/manifest.ismc"
        );
        assert!(config.parameters().get_value("Unknown").is_none());
        assert_eq!(
            config.protocol_hoster().active_protocol().await.as_deref(),
            Some("null")
        );
    }

    #[test]
    fn configuration_owns_its_parameters() {
        let hoster = NullHoster;
        let mut callers_copy = mshs_parameters();
        let config = ParserPluginConfiguration::new(callers_copy.clone(), &hoster);

        callers_copy.set(names::MSHS_MANIFEST, "http://changed/manifest.ismc");
        callers_copy.set("Extra", "1");

        assert_eq!(
            config.parameters().get_string(names::MSHS_MANIFEST, ""),
            "http://example/manifest.ismc"
        );
        assert!(!config.parameters().contains("Extra"));
    }

    #[test]
    fn set_parameter_forwards_to_collection() {
        let hoster = NullHoster;
        let mut config = PluginConfiguration::new(ParameterCollection::new(), &hoster);
        config.set_parameter(names::URL, "http://example/stream");
        assert_eq!(config.parameters().len(), 1);

        let parser: ParserPluginConfiguration<'_> = config.clone().into();
        assert_eq!(parser.parameters().get_string(names::URL, ""), "http://example/stream");
        assert_eq!(parser.into_inner().into_parameters().len(), 1);
    }

    #[test]
    fn protocol_configuration_checks_required_names() {
        let ok = ProtocolPluginConfiguration::with_required(mshs_parameters(), &[names::MSHS_BASE_URL]);
        assert!(ok.is_ok());

        let err = ProtocolPluginConfiguration::with_required(ParameterCollection::new(), &[names::URL]);
        assert!(matches!(err, Err(SplitterError::MissingParameter { .. })));
    }
}
