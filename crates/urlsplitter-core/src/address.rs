// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Endpoint addresses and preference-ordered failover lists.

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::collection::{Collection, CollectionItem};
use crate::error::SplitterError;

/// Socket type an address is meant to be connected with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum SocketKind {
    Stream,
    Datagram,
}

/// Transport protocol matching a [`SocketKind`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TransportProtocol {
    Tcp,
    Udp,
}

impl From<SocketKind> for TransportProtocol {
    fn from(kind: SocketKind) -> Self {
        match kind {
            SocketKind::Stream => TransportProtocol::Tcp,
            SocketKind::Datagram => TransportProtocol::Udp,
        }
    }
}

/// An immutable resolved endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpAddress {
    socket: SocketAddr,
    kind: SocketKind,
    protocol: TransportProtocol,
}

impl IpAddress {
    pub fn new(socket: SocketAddr, kind: SocketKind) -> Self {
        Self {
            socket,
            kind,
            protocol: kind.into(),
        }
    }

    /// Stream (TCP) endpoint for `ip:port`.
    pub fn stream(ip: IpAddr, port: u16) -> Self {
        Self::new(SocketAddr::new(ip, port), SocketKind::Stream)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.socket
    }

    pub fn ip(&self) -> IpAddr {
        self.socket.ip()
    }

    pub fn port(&self) -> u16 {
        self.socket.port()
    }

    pub fn is_ipv4(&self) -> bool {
        self.socket.is_ipv4()
    }

    pub fn kind(&self) -> SocketKind {
        self.kind
    }

    pub fn protocol(&self) -> TransportProtocol {
        self.protocol
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.socket, self.protocol)
    }
}

impl CollectionItem for IpAddress {
    fn clone_item(&self) -> Option<Self> {
        Some(*self)
    }
}

/// Preference-ordered list of candidate endpoints. Duplicates are allowed.
pub type IpAddressCollection = Collection<IpAddress>;

/// Resolve `host` into a failover list, keeping the resolver's order.
pub fn resolve_host(
    host: &str,
    port: u16,
    kind: SocketKind,
) -> Result<IpAddressCollection, SplitterError> {
    let resolved = (host, port)
        .to_socket_addrs()
        .map_err(|source| SplitterError::Resolve {
            host: host.to_string(),
            source,
        })?;

    let addresses: IpAddressCollection =
        resolved.map(|socket| IpAddress::new(socket, kind)).collect();

    if addresses.is_empty() {
        return Err(SplitterError::Resolve {
            host: host.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses"),
        });
    }

    debug!(host, port, count = addresses.len(), "resolved endpoint candidates");
    Ok(addresses)
}
