// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser plugin recognising streams by a leading byte marker.

use async_trait::async_trait;
use tracing::debug;

use urlsplitter_core::parameters::names;
use urlsplitter_core::{ParseResult, ParserPlugin, ParserPluginConfiguration, SplitterError};
use urlsplitter_plugin::ParserFactory;

/// Parser that opens its configured URL through the hoster and checks
/// whether the stream starts with `marker`.
///
/// The URL comes from `MshsManifest` when present, else `Url`.
pub struct MarkerParser<'h> {
    name: String,
    marker: Vec<u8>,
    config: ParserPluginConfiguration<'h>,
}

impl<'h> MarkerParser<'h> {
    pub fn new(
        name: impl Into<String>,
        marker: impl Into<Vec<u8>>,
        config: ParserPluginConfiguration<'h>,
    ) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
            config,
        }
    }

    pub fn configuration(&self) -> &ParserPluginConfiguration<'h> {
        &self.config
    }

    fn source_url(&self) -> Result<String, SplitterError> {
        let parameters = self.config.parameters();
        [names::MSHS_MANIFEST, names::URL]
            .into_iter()
            .find(|name| parameters.contains(name))
            .map(|name| parameters.get_string(name, ""))
            .ok_or_else(|| SplitterError::MissingParameter {
                name: names::URL.to_string(),
            })
    }
}

#[async_trait]
impl ParserPlugin for MarkerParser<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn parse(&self) -> Result<ParseResult, SplitterError> {
        let url = self.source_url()?;
        let hoster = self.config.protocol_hoster();
        hoster.open(&url).await?;

        let head = hoster.read(0, self.marker.len()).await?;
        debug!(parser = %self.name, url = %url, bytes = head.len(), "inspected stream head");
        if head.len() < self.marker.len() && self.marker.starts_with(&head) {
            return Ok(ParseResult::PendingData);
        }
        if head == self.marker {
            Ok(ParseResult::Recognized { streams: 1 })
        } else {
            Ok(ParseResult::NotRecognized)
        }
    }
}

/// Factory producing [`MarkerParser`] instances.
pub struct MarkerParserFactory {
    name: String,
    marker: Vec<u8>,
}

impl MarkerParserFactory {
    pub fn new(name: impl Into<String>, marker: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
        }
    }
}

impl ParserFactory for MarkerParserFactory {
    fn create<'h>(
        &self,
        config: ParserPluginConfiguration<'h>,
    ) -> Result<Box<dyn ParserPlugin + 'h>, SplitterError> {
        Ok(Box::new(MarkerParser::new(
            self.name.clone(),
            self.marker.clone(),
            config,
        )))
    }
}
