// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by plugin traits and the plugin registry.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies the role of a plugin in the registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum PluginKind {
    /// Retrieves bytes for a URL scheme (HTTP, MSHS, ...).
    Protocol,
    /// Recognises a stream format and exposes its elementary streams.
    Parser,
}

/// Outcome of a parser plugin inspecting the opened stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    /// The parser recognised the format and found this many streams.
    Recognized { streams: usize },
    /// The stream is not in a format this parser handles.
    NotRecognized,
    /// Not enough data has arrived to decide yet.
    PendingData,
}
