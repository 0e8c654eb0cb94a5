//! `host:port` handling and network tokens

use std::net::SocketAddr;

/// Address family requested by a network token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Any,
    V4,
    V6,
}

impl Family {
    /// Family for a stream network token, `None` for anything but tcp/tcp4/tcp6.
    #[must_use]
    pub fn from_network(network: &str) -> Option<Self> {
        match network {
            "tcp" => Some(Family::Any),
            "tcp4" => Some(Family::V4),
            "tcp6" => Some(Family::V6),
            _ => None,
        }
    }

    #[must_use]
    pub fn admits(self, addr: &SocketAddr) -> bool {
        match self {
            Family::Any => true,
            Family::V4 => addr.is_ipv4(),
            Family::V6 => addr.is_ipv6(),
        }
    }
}

/// Split `host:port`, `[ipv6]:port` into host and port.
///
/// The port is not interpreted, it may even be empty. The host of a
/// bracketed address is returned without brackets.
///
/// # Errors
///
/// Returns a static reason when the port is missing, a colon appears in an
/// unbracketed host, or brackets are unbalanced.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str), &'static str> {
    let (host, port) = if let Some(rest) = hostport.strip_prefix('[') {
        let end = rest.find(']').ok_or("missing ']' in address")?;
        let host = &rest[..end];
        let after = &rest[end + 1..];
        let port = after.strip_prefix(':').ok_or("missing port in address")?;
        if port.contains(':') {
            return Err("too many colons in address");
        }
        (host, port)
    } else {
        let colon = hostport.rfind(':').ok_or("missing port in address")?;
        let host = &hostport[..colon];
        if host.contains(':') {
            return Err("too many colons in address");
        }
        (host, &hostport[colon + 1..])
    };

    if host.contains('[') || host.contains(']') {
        return Err("unexpected bracket in address");
    }
    Ok((host, port))
}
