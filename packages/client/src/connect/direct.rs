//! Direct (unproxied) dialer
//!
//! The default upstream of every HTTP proxy client and the innermost link
//! of any proxy chain.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use super::addr::Family;
use super::tcp::{connect_to_address_list, resolve_host};
use super::types::{Connection, TcpConnection};
use crate::config::ConfigurationError;
use crate::error::{self, Result};
use crate::proxy::ProxyClient;

#[derive(Debug, Clone, Default)]
pub struct DirectProxyClient {
    local_addr: Option<SocketAddr>,
}

impl DirectProxyClient {
    /// Create a direct dialer, optionally bound to `local_addr` (`""` for none).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `local_addr` is not a socket address.
    pub fn new(local_addr: &str) -> Result<Self> {
        let local_addr = match local_addr.trim() {
            "" => None,
            addr => Some(addr.parse::<SocketAddr>().map_err(|_| {
                error::config(ConfigurationError::InvalidLocalAddress(addr.to_string()))
            })?),
        };
        Ok(Self { local_addr })
    }

    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    fn connect(
        &self,
        family: Family,
        address: &str,
        local: Option<SocketAddr>,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        let addrs = resolve_host(address, family)
            .map_err(|e| error::connect(e).with_address(address))?;
        let timeout = (!timeout.is_zero()).then_some(timeout);
        let stream = connect_to_address_list(&addrs, local, timeout).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                error::timeout().with_address(address)
            } else {
                error::connect(e).with_address(address)
            }
        })?;
        tracing::trace!(address, "direct connection established");
        Ok(Box::new(TcpConnection::new(stream)))
    }
}

impl ProxyClient for DirectProxyClient {
    fn dial(&self, network: &str, address: &str) -> Result<Box<dyn Connection>> {
        let network = network.to_ascii_lowercase();
        if network.starts_with("tcp") {
            self.dial_tcp_addr_timeout(&network, address, Duration::ZERO)
        } else if network.starts_with("udp") {
            Err(error::unsupported("udp is datagram oriented, use dial_udp"))
        } else {
            Err(error::unsupported("unknown network type"))
        }
    }

    fn dial_timeout(
        &self,
        network: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        match network {
            "tcp" | "tcp4" | "tcp6" => self.dial_tcp_addr_timeout(network, address, timeout),
            _ => Err(error::unsupported("unsupported network type")),
        }
    }

    fn dial_tcp(
        &self,
        network: &str,
        local: Option<SocketAddr>,
        remote: SocketAddr,
    ) -> Result<Box<dyn Connection>> {
        let family = Family::from_network(network)
            .ok_or_else(|| error::unsupported("unsupported network type"))?;
        let local = local.or(self.local_addr);
        self.connect(family, &remote.to_string(), local, Duration::ZERO)
    }

    fn dial_tcp_addr_timeout(
        &self,
        network: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        let family = Family::from_network(network)
            .ok_or_else(|| error::unsupported("unsupported network type"))?;
        self.connect(family, address, self.local_addr, timeout)
    }

    fn dial_udp(
        &self,
        network: &str,
        local: Option<SocketAddr>,
        remote: SocketAddr,
    ) -> Result<UdpSocket> {
        let unspecified: SocketAddr = match (network, remote) {
            ("udp" | "udp4", SocketAddr::V4(_)) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            ("udp" | "udp6", SocketAddr::V6(_)) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
            _ => return Err(error::unsupported("unsupported network type")),
        };
        let local = local.or(self.local_addr).unwrap_or(unspecified);
        let socket =
            UdpSocket::bind(local).map_err(|e| error::connect(e).with_address(local.to_string()))?;
        socket
            .connect(remote)
            .map_err(|e| error::connect(e).with_address(remote.to_string()))?;
        Ok(socket)
    }

    fn up_proxy(&self) -> Option<Arc<dyn ProxyClient>> {
        None
    }

    fn set_up_proxy(&self, _upstream: Arc<dyn ProxyClient>) -> Result<()> {
        Err(error::config(ConfigurationError::NoUpstream))
    }

    fn describe(&self) -> String {
        match self.local_addr {
            Some(local) => format!("direct (from {local})"),
            None => "direct".to_string(),
        }
    }
}
