// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Protocol hoster dispatching to owned protocol plugins.
//!
//! `open` walks the hosted protocols in order and keeps the first one that
//! supports the URL and opens it. Later reads and seeks go to that protocol
//! until `close` or the next `open`.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use urlsplitter_core::{ParameterCollection, ProtocolHoster, ProtocolPlugin, SplitterError};

use crate::registry::PluginRegistry;

/// Owns protocol plugins and routes stream access to the active one.
pub struct PluginProtocolHoster {
    protocols: Vec<Box<dyn ProtocolPlugin>>,
    active: Mutex<Option<usize>>,
}

impl PluginProtocolHoster {
    /// Host the given protocols. Dispatch order is the order given.
    pub fn new(protocols: Vec<Box<dyn ProtocolPlugin>>) -> Self {
        Self {
            protocols,
            active: Mutex::new(None),
        }
    }

    /// Host every enabled protocol of `registry`, configured from `parameters`.
    pub fn from_registry(registry: &PluginRegistry, parameters: &ParameterCollection) -> Self {
        Self::new(registry.create_protocols(parameters))
    }

    /// Names of the hosted protocols in dispatch order.
    pub fn protocol_names(&self) -> Vec<&str> {
        self.protocols.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}

#[async_trait]
impl ProtocolHoster for PluginProtocolHoster {
    async fn open(&self, url: &str) -> Result<(), SplitterError> {
        let mut active = self.active.lock().await;
        if let Some(index) = active.take() {
            if let Err(e) = self.protocols[index].close().await {
                warn!(protocol = self.protocols[index].name(), error = %e, "close before reopen failed");
            }
        }

        let mut last_error = None;
        for (index, protocol) in self.protocols.iter().enumerate() {
            if !protocol.supports(url) {
                continue;
            }
            match protocol.open(url).await {
                Ok(()) => {
                    info!(protocol = protocol.name(), url, "stream opened");
                    *active = Some(index);
                    return Ok(());
                }
                Err(e) => {
                    debug!(protocol = protocol.name(), url, error = %e, "protocol failed to open, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SplitterError::PluginNotFound {
            kind: "Protocol".to_string(),
            name: url.split_once("://").map_or(url, |(scheme, _)| scheme).to_string(),
        }))
    }

    // The guard is held across the dispatch so `open` and `close` wait for
    // in-flight reads and seeks.
    async fn read(&self, position: u64, length: usize) -> Result<Vec<u8>, SplitterError> {
        let active = self.active.lock().await;
        let index = (*active).ok_or(SplitterError::NoActiveProtocol)?;
        self.protocols[index].read(position, length).await
    }

    async fn seek(&self, position: u64) -> Result<u64, SplitterError> {
        let active = self.active.lock().await;
        let index = (*active).ok_or(SplitterError::NoActiveProtocol)?;
        self.protocols[index].seek(position).await
    }

    async fn close(&self) -> Result<(), SplitterError> {
        match self.active.lock().await.take() {
            Some(index) => self.protocols[index].close().await,
            None => Ok(()),
        }
    }

    async fn active_protocol(&self) -> Option<String> {
        let index = (*self.active.lock().await)?;
        Some(self.protocols[index].name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct SchemeProtocol {
        name: &'static str,
        scheme: &'static str,
        fail_open: bool,
        read_delay: Duration,
        open: AtomicBool,
    }

    impl SchemeProtocol {
        fn boxed(name: &'static str, scheme: &'static str, fail_open: bool) -> Box<dyn ProtocolPlugin> {
            Box::new(Self {
                name,
                scheme,
                fail_open,
                read_delay: Duration::ZERO,
                open: AtomicBool::new(false),
            })
        }

        fn slow(name: &'static str, scheme: &'static str, read_delay: Duration) -> Box<dyn ProtocolPlugin> {
            Box::new(Self {
                name,
                scheme,
                fail_open: false,
                read_delay,
                open: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl ProtocolPlugin for SchemeProtocol {
        fn name(&self) -> &str {
            self.name
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn supports(&self, url: &str) -> bool {
            url.starts_with(self.scheme)
        }
        async fn open(&self, _url: &str) -> Result<(), SplitterError> {
            if self.fail_open {
                return Err(SplitterError::protocol("connection refused"));
            }
            self.open.store(true, Ordering::SeqCst);
            Ok(())
        }
        async fn read(&self, position: u64, length: usize) -> Result<Vec<u8>, SplitterError> {
            if !self.read_delay.is_zero() {
                tokio::time::sleep(self.read_delay).await;
            }
            if !self.open.load(Ordering::SeqCst) {
                return Err(SplitterError::protocol("not open"));
            }
            Ok(self.name.bytes().cycle().skip(position as usize).take(length).collect())
        }
        async fn seek(&self, position: u64) -> Result<u64, SplitterError> {
            Ok(position)
        }
        async fn close(&self) -> Result<(), SplitterError> {
            self.open.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn open_dispatches_by_scheme() {
        let hoster = PluginProtocolHoster::new(vec![
            SchemeProtocol::boxed("http", "http://", false),
            SchemeProtocol::boxed("rtsp", "rtsp://", false),
        ]);

        hoster.open("rtsp://camera/stream").await.unwrap();
        assert_eq!(hoster.active_protocol().await.as_deref(), Some("rtsp"));
        assert_eq!(hoster.read(0, 4).await.unwrap(), b"rtsp");

        hoster.open("http://example/video").await.unwrap();
        assert_eq!(hoster.active_protocol().await.as_deref(), Some("http"));
    }

    #[tokio::test]
    async fn open_falls_over_to_next_supporting_protocol() {
        let hoster = PluginProtocolHoster::new(vec![
            SchemeProtocol::boxed("mshs", "http://", true),
            SchemeProtocol::boxed("http", "http://", false),
        ]);

        hoster.open("http://example/manifest").await.unwrap();
        assert_eq!(hoster.active_protocol().await.as_deref(), Some("http"));
        assert_eq!(hoster.protocol_names(), vec!["mshs", "http"]);
    }

    #[tokio::test]
    async fn open_reports_last_failure_when_all_fail() {
        let hoster = PluginProtocolHoster::new(vec![SchemeProtocol::boxed("http", "http://", true)]);
        let err = hoster.open("http://example").await.unwrap_err();
        assert!(matches!(err, SplitterError::Protocol { .. }));
        assert!(hoster.active_protocol().await.is_none());
    }

    #[tokio::test]
    async fn open_unsupported_scheme_is_not_found() {
        let hoster = PluginProtocolHoster::new(vec![SchemeProtocol::boxed("http", "http://", false)]);
        match hoster.open("udp://239.0.0.1:1234").await {
            Err(SplitterError::PluginNotFound { name, .. }) => assert_eq!(name, "udp"),
            other => panic!("expected PluginNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_without_open_stream_fails() {
        let hoster = PluginProtocolHoster::new(vec![SchemeProtocol::boxed("http", "http://", false)]);
        assert!(matches!(
            hoster.read(0, 1).await,
            Err(SplitterError::NoActiveProtocol)
        ));

        hoster.open("http://example").await.unwrap();
        hoster.close().await.unwrap();
        assert!(matches!(
            hoster.seek(10).await,
            Err(SplitterError::NoActiveProtocol)
        ));
        assert!(hoster.close().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn close_waits_for_in_flight_read() {
        let hoster = PluginProtocolHoster::new(vec![SchemeProtocol::slow(
            "http",
            "http://",
            Duration::from_millis(50),
        )]);
        hoster.open("http://example").await.unwrap();

        let (read, closed) = tokio::join!(hoster.read(0, 4), async {
            tokio::task::yield_now().await;
            hoster.close().await
        });

        assert_eq!(read.unwrap(), b"http");
        closed.unwrap();
        assert!(hoster.active_protocol().await.is_none());
    }
}
