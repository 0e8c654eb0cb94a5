//! DNS resolution and address handling utilities
//!
//! Provides DNS resolution with an IP address fast path and address family
//! filtering for `tcp4` / `tcp6` dials.

use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::connect::addr::{Family, split_host_port};

/// Resolve `host:port` to the socket addresses admitted by `family`.
pub fn resolve_host(address: &str, family: Family) -> io::Result<Vec<SocketAddr>> {
    let (host, port) = split_host_port(address).map_err(|reason| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("{reason}: {address}"))
    })?;
    let port: u16 = port.parse().map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("invalid port in address: {address}"))
    })?;

    // Fast path for IP addresses
    let resolved: Vec<SocketAddr> = if let Ok(ip) = IpAddr::from_str(host) {
        vec![SocketAddr::new(ip, port)]
    } else {
        (host, port).to_socket_addrs()?.collect()
    };

    let admitted: Vec<SocketAddr> = resolved.into_iter().filter(|a| family.admits(a)).collect();
    if admitted.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no {family:?} addresses resolved for {host}"),
        ));
    }
    Ok(admitted)
}
