// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for urlsplitter integration tests.
//!
//! Provides in-memory plugins and test harness infrastructure for fast,
//! deterministic tests without network access.
//!
//! # Components
//!
//! - [`MemoryProtocol`] - Protocol plugin serving a fixed byte body
//! - [`MarkerParser`] - Parser recognising streams by a leading marker
//! - [`TestHarness`] - Registry, hoster, and parameters wired together

pub mod harness;
pub mod memory_protocol;
pub mod marker_parser;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use marker_parser::{MarkerParser, MarkerParserFactory};
pub use memory_protocol::{MemoryProtocol, MemoryProtocolFactory};
