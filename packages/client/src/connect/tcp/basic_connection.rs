//! Basic TCP connection establishment
//!
//! Tries each resolved address in turn under one overall budget, optionally
//! binding a local address first.

use std::io;
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, Socket, Type};

/// Connect to the first reachable address.
///
/// `timeout` bounds the whole attempt, not each address.
pub fn connect_to_address_list(
    addrs: &[SocketAddr],
    local: Option<SocketAddr>,
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    if addrs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no addresses to connect to",
        ));
    }

    let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
    let mut last_error = None;

    for addr in addrs {
        if let Some(local) = local {
            if local.is_ipv4() != addr.is_ipv4() {
                tracing::debug!("Skipping {} for local address {}", addr, local);
                continue;
            }
        }

        let remaining = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "connect timed out"));
                }
                Some(remaining)
            }
            None => None,
        };

        match connect_one(addr, local, remaining) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Failed to connect to {}: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "no address matches the local address family",
        )
    }))
}

fn connect_one(
    addr: &SocketAddr,
    local: Option<SocketAddr>,
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(*addr), Type::STREAM, Some(Protocol::TCP))?;
    if let Some(local) = local {
        socket.bind(&local.into())?;
    }
    match timeout {
        Some(t) => socket.connect_timeout(&(*addr).into(), t)?,
        None => socket.connect(&(*addr).into())?,
    }
    Ok(socket.into())
}
