// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the urlsplitter source filter.

use thiserror::Error;

/// The primary error type shared by collections, configurations, and plugins.
#[derive(Debug, Error)]
pub enum SplitterError {
    /// Invalid or incomplete configuration handed to a constructor.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A parameter a plugin requires is absent from its configuration.
    #[error("missing required parameter `{name}`")]
    MissingParameter { name: String },

    /// An item in a collection cannot produce an independent copy.
    #[error("item {index} ({item_type}) does not support cloning")]
    CloneUnsupported {
        index: usize,
        item_type: &'static str,
    },

    /// Requested plugin was not found in the registry.
    #[error("plugin not found: {kind}/{name}")]
    PluginNotFound { kind: String, name: String },

    /// No hosted protocol has an open stream.
    #[error("no active protocol")]
    NoActiveProtocol,

    /// Protocol plugin failure (connect, read, seek).
    #[error("protocol error: {message}")]
    Protocol {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Host name resolution failed or produced no addresses.
    #[error("cannot resolve `{host}`: {source}")]
    Resolve {
        host: String,
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SplitterError {
    /// Shorthand for a protocol error without an underlying cause.
    pub fn protocol(message: impl Into<String>) -> Self {
        SplitterError::Protocol {
            message: message.into(),
            source: None,
        }
    }
}
