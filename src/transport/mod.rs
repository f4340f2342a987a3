//! Packet transmission
//!
//! The send loop only needs somewhere to put finished segments; the
//! [`PacketSink`] trait is that seam. [`RawSocket`] is the production sink.

mod raw;

pub use raw::RawSocket;

use crate::{Error, Result};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};

/// Destination for packed segments
pub trait PacketSink: Send {
    /// Transmit one segment, returning the number of bytes accepted
    fn send(&mut self, buf: &[u8]) -> impl Future<Output = Result<usize>> + Send;
}

/// Resolve `host` to its first IPv4 address.
pub async fn resolve_ipv4(host: &str) -> Result<Ipv4Addr> {
    if let Ok(addr) = host.parse::<Ipv4Addr>() {
        return Ok(addr);
    }

    let addrs = tokio::net::lookup_host((host, 0)).await.map_err(|e| {
        tracing::debug!("lookup of {} failed: {}", host, e);
        Error::Resolve {
            host: host.to_string(),
        }
    })?;

    addrs
        .filter_map(|sa| match sa.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| Error::Resolve {
            host: host.to_string(),
        })
}
