// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser plugin trait for stream-format recognition.

use async_trait::async_trait;

use crate::error::SplitterError;
use crate::types::ParseResult;

/// A format-specific parser built from a
/// [`ParserPluginConfiguration`](crate::configuration::ParserPluginConfiguration).
///
/// Parsers never address a protocol directly; all I/O goes through the
/// protocol hoster referenced by their configuration.
#[async_trait]
pub trait ParserPlugin: Send + Sync {
    /// Returns the registry name of this parser.
    fn name(&self) -> &str;

    /// Returns the semantic version of this parser.
    fn version(&self) -> semver::Version;

    /// Opens the configured URL through the hoster and inspects the stream.
    async fn parse(&self) -> Result<ParseResult, SplitterError>;
}
