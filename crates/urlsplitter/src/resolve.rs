// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `urlsplitter resolve` command implementation.

use serde::Serialize;
use tracing::{debug, info};
use urlsplitter_core::address::resolve_host;
use urlsplitter_core::{IpAddressCollection, SocketKind, SplitterError};

/// One failover candidate for `--json` output.
#[derive(Debug, Serialize)]
pub struct Candidate {
    pub rank: usize,
    pub address: String,
    pub protocol: String,
}

fn candidates(addresses: &IpAddressCollection) -> Vec<Candidate> {
    addresses
        .iter()
        .enumerate()
        .map(|(rank, address)| Candidate {
            rank,
            address: address.socket_addr().to_string(),
            protocol: address.protocol().to_string(),
        })
        .collect()
}

/// Run the `urlsplitter resolve` command.
///
/// Name resolution blocks, so it runs on the blocking pool.
pub async fn run_resolve(
    host: String,
    port: u16,
    datagram: bool,
    json: bool,
) -> Result<(), SplitterError> {
    let kind = if datagram {
        SocketKind::Datagram
    } else {
        SocketKind::Stream
    };

    debug!(host = %host, port, %kind, "resolving endpoint");
    let addresses = tokio::task::spawn_blocking(move || resolve_host(&host, port, kind))
        .await
        .map_err(|e| SplitterError::Internal(format!("resolver task failed: {e}")))??;

    let candidates = candidates(&addresses);
    info!(count = candidates.len(), "failover list resolved");
    if json {
        let rendered = serde_json::to_string_pretty(&candidates)
            .map_err(|e| SplitterError::Internal(format!("failed to render addresses: {e}")))?;
        println!("{rendered}");
    } else {
        for candidate in &candidates {
            println!(
                "{:>3}  {} ({})",
                candidate.rank, candidate.address, candidate.protocol
            );
        }
    }
    Ok(())
}
