// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin trait definitions.
//!
//! Protocol plugins fetch bytes; a [`ProtocolHoster`] owns them and
//! dispatches between them; parser plugins read through the hoster. All
//! traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod parser;
pub mod protocol;

pub use parser::ParserPlugin;
pub use protocol::{ProtocolHoster, ProtocolPlugin};
