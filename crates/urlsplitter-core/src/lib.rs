// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the urlsplitter source filter.
//!
//! This crate provides the configuration and ownership substrate shared by
//! the filter, its protocol plugins, and its parser plugins: an owning
//! collection with all-or-nothing deep copy, the keyed parameter collection
//! built on it, endpoint failover lists, and the configuration objects
//! plugins are constructed with.

pub mod address;
pub mod collection;
pub mod configuration;
pub mod error;
pub mod parameters;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use address::{IpAddress, IpAddressCollection, SocketKind, TransportProtocol};
pub use collection::{Collection, CollectionItem};
pub use configuration::{
    ParserPluginConfiguration, PluginConfiguration, PluginConfigurationBuilder,
    ProtocolPluginConfiguration,
};
pub use error::SplitterError;
pub use parameters::{Parameter, ParameterCollection, ParameterValue};
pub use types::{ParseResult, PluginKind};

pub use traits::{ParserPlugin, ProtocolHoster, ProtocolPlugin};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitter_error_variants_render() {
        let cases = [
            SplitterError::Configuration("bad".into()).to_string(),
            SplitterError::MissingParameter { name: "Url".into() }.to_string(),
            SplitterError::CloneUnsupported {
                index: 2,
                item_type: "Handle",
            }
            .to_string(),
            SplitterError::PluginNotFound {
                kind: "Parser".into(),
                name: "mshs".into(),
            }
            .to_string(),
            SplitterError::NoActiveProtocol.to_string(),
            SplitterError::protocol("reset").to_string(),
            SplitterError::Internal("oops".into()).to_string(),
        ];
        assert_eq!(cases[0], "configuration error: bad");
        assert_eq!(cases[1], "missing required parameter `Url`");
        assert_eq!(cases[2], "item 2 (Handle) does not support cloning");
        assert_eq!(cases[3], "plugin not found: Parser/mshs");
        assert_eq!(cases[4], "no active protocol");
        assert_eq!(cases[5], "protocol error: reset");
        assert_eq!(cases[6], "internal error: oops");
    }

    #[test]
    fn plugin_kind_round_trips_through_strings() {
        use std::str::FromStr;

        for kind in [PluginKind::Protocol, PluginKind::Parser] {
            let parsed = PluginKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(kind, parsed);
        }
        assert!(PluginKind::from_str("Demuxer").is_err());
    }

    #[test]
    fn plugin_kind_serialization() {
        let json = serde_json::to_string(&PluginKind::Parser).expect("should serialize");
        assert_eq!(json, "\"Parser\"");
        let parsed: PluginKind = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(parsed, PluginKind::Parser);
    }

    #[test]
    fn all_plugin_traits_are_exported() {
        fn _assert_protocol_plugin<T: ProtocolPlugin>() {}
        fn _assert_protocol_hoster<T: ProtocolHoster>() {}
        fn _assert_parser_plugin<T: ParserPlugin>() {}
    }
}
