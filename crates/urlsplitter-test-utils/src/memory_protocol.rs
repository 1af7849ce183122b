// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory protocol plugin for deterministic testing.
//!
//! `MemoryProtocol` serves a fixed body for every URL with one of its
//! schemes, and keeps the parameters it was configured with so tests can
//! check what reached the plugin.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use urlsplitter_core::{
    ParameterCollection, ProtocolPlugin, ProtocolPluginConfiguration, SplitterError,
};
use urlsplitter_plugin::ProtocolFactory;

/// Set this parameter to `true` to make `open` fail.
pub const FAIL_OPEN_PARAMETER: &str = "MemoryFailOpen";

/// A protocol plugin serving `body` from memory.
pub struct MemoryProtocol {
    name: String,
    schemes: Vec<String>,
    body: Arc<Vec<u8>>,
    config: ProtocolPluginConfiguration,
    opened: Mutex<Vec<String>>,
    is_open: Mutex<bool>,
}

impl MemoryProtocol {
    pub fn new(
        name: impl Into<String>,
        schemes: Vec<String>,
        body: Arc<Vec<u8>>,
        config: ProtocolPluginConfiguration,
    ) -> Self {
        Self {
            name: name.into(),
            schemes,
            body,
            config,
            opened: Mutex::new(Vec::new()),
            is_open: Mutex::new(false),
        }
    }

    /// Parameters this plugin was constructed with.
    pub fn parameters(&self) -> &ParameterCollection {
        self.config.parameters()
    }

    /// URLs opened so far, in order.
    pub async fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().await.clone()
    }
}

#[async_trait]
impl ProtocolPlugin for MemoryProtocol {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn supports(&self, url: &str) -> bool {
        url.split_once("://").is_some_and(|(scheme, _)| {
            self.schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme))
        })
    }

    async fn open(&self, url: &str) -> Result<(), SplitterError> {
        if self.config.parameters().get_bool(FAIL_OPEN_PARAMETER, false) {
            return Err(SplitterError::protocol(format!("{} refused {url}", self.name)));
        }
        self.opened.lock().await.push(url.to_string());
        *self.is_open.lock().await = true;
        Ok(())
    }

    async fn read(&self, position: u64, length: usize) -> Result<Vec<u8>, SplitterError> {
        if !*self.is_open.lock().await {
            return Err(SplitterError::protocol("stream not open"));
        }
        let start = usize::try_from(position)
            .unwrap_or(usize::MAX)
            .min(self.body.len());
        let end = start.saturating_add(length).min(self.body.len());
        Ok(self.body[start..end].to_vec())
    }

    async fn seek(&self, position: u64) -> Result<u64, SplitterError> {
        Ok(position.min(self.body.len() as u64))
    }

    async fn close(&self) -> Result<(), SplitterError> {
        *self.is_open.lock().await = false;
        Ok(())
    }
}

/// Factory producing [`MemoryProtocol`] instances sharing one body.
pub struct MemoryProtocolFactory {
    name: String,
    schemes: Vec<String>,
    body: Arc<Vec<u8>>,
}

impl MemoryProtocolFactory {
    pub fn new(name: impl Into<String>, schemes: &[&str], body: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            schemes: schemes.iter().map(|s| s.to_string()).collect(),
            body: Arc::new(body.into()),
        }
    }
}

impl ProtocolFactory for MemoryProtocolFactory {
    fn create(
        &self,
        config: ProtocolPluginConfiguration,
    ) -> Result<Box<dyn ProtocolPlugin>, SplitterError> {
        Ok(Box::new(MemoryProtocol::new(
            self.name.clone(),
            self.schemes.clone(),
            Arc::clone(&self.body),
            config,
        )))
    }
}
