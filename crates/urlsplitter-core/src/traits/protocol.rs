// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Protocol plugin and protocol hoster traits.

use async_trait::async_trait;

use crate::error::SplitterError;

/// A plugin retrieving stream bytes over one family of URL schemes.
///
/// Built from a [`ProtocolPluginConfiguration`](crate::configuration::ProtocolPluginConfiguration).
#[async_trait]
pub trait ProtocolPlugin: Send + Sync {
    /// Returns the registry name of this protocol.
    fn name(&self) -> &str;

    /// Returns the semantic version of this protocol implementation.
    fn version(&self) -> semver::Version;

    /// Returns true if this protocol can serve `url`.
    fn supports(&self, url: &str) -> bool;

    /// Opens a stream for `url`.
    async fn open(&self, url: &str) -> Result<(), SplitterError>;

    /// Reads up to `length` bytes starting at `position`.
    async fn read(&self, position: u64, length: usize) -> Result<Vec<u8>, SplitterError>;

    /// Moves the stream to `position`, returning the position reached.
    async fn seek(&self, position: u64) -> Result<u64, SplitterError>;

    /// Closes the stream, releasing any held connection.
    async fn close(&self) -> Result<(), SplitterError>;
}

/// Owns protocol plugins and exposes protocol-agnostic stream access.
///
/// Parser plugins hold only a borrowed reference to a hoster, so the hoster
/// always outlives every plugin configured against it.
#[async_trait]
pub trait ProtocolHoster: Send + Sync {
    /// Opens `url` with the first hosted protocol able to serve it.
    async fn open(&self, url: &str) -> Result<(), SplitterError>;

    /// Reads from the active protocol.
    async fn read(&self, position: u64, length: usize) -> Result<Vec<u8>, SplitterError>;

    /// Seeks the active protocol.
    async fn seek(&self, position: u64) -> Result<u64, SplitterError>;

    /// Closes the active protocol, if any.
    async fn close(&self) -> Result<(), SplitterError>;

    /// Name of the protocol serving the open stream.
    async fn active_protocol(&self) -> Option<String>;
}
