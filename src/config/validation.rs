//! Configuration validation.
//!
//! # Responsibilities
//! - Check the listen address is a usable `host:port`
//! - Resolve host names once, at startup
//!
//! # Design Decisions
//! - Validation runs before the config is accepted into the system
//! - An empty host (":8443") binds every interface

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};

use crate::config::loader::ConfigError;

/// Parse and resolve a listen address of the form `host:port`.
pub fn parse_listen_address(raw: &str) -> Result<SocketAddr, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidListenAddress {
        address: raw.to_string(),
        reason: reason.to_string(),
    };

    let raw = raw.trim();
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let (host, port) = raw.rsplit_once(':').ok_or_else(|| invalid("missing port"))?;
    let port: u16 = port.parse().map_err(|_| invalid("port is not a number"))?;

    if host.is_empty() {
        return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
    }

    (host, port)
        .to_socket_addrs()
        .map_err(|e| invalid(&e.to_string()))?
        .next()
        .ok_or_else(|| invalid("host did not resolve"))
}
