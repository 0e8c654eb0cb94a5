//! The chainable dialer contract

use std::fmt;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use crate::connect::Connection;
use crate::error::Result;

/// Something that opens stream connections, possibly through a proxy.
///
/// Every dial method hands back a `Box<dyn Connection>`, so any client can
/// serve as the upstream of an HTTP proxy client and chains nest freely.
pub trait ProxyClient: Send + Sync + fmt::Debug {
    /// Dial `address` over `network`, which must start with `tcp`.
    fn dial(&self, network: &str, address: &str) -> Result<Box<dyn Connection>>;

    /// Dial with an overall budget; `Duration::ZERO` means unbounded.
    fn dial_timeout(
        &self,
        network: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>>;

    fn dial_tcp(
        &self,
        network: &str,
        local: Option<SocketAddr>,
        remote: SocketAddr,
    ) -> Result<Box<dyn Connection>>;

    fn dial_tcp_addr(&self, network: &str, address: &str) -> Result<Box<dyn Connection>> {
        self.dial_tcp_addr_timeout(network, address, Duration::ZERO)
    }

    fn dial_tcp_addr_timeout(
        &self,
        network: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>>;

    fn dial_udp(
        &self,
        network: &str,
        local: Option<SocketAddr>,
        remote: SocketAddr,
    ) -> Result<UdpSocket>;

    /// The dialer used to reach this client's proxy, `None` when direct.
    fn up_proxy(&self) -> Option<Arc<dyn ProxyClient>>;

    /// Replace the upstream dialer. Dials already in flight keep the old one.
    fn set_up_proxy(&self, upstream: Arc<dyn ProxyClient>) -> Result<()>;

    /// Short label such as `https://proxy:8443` or `direct`.
    fn describe(&self) -> String;
}
