//! The stream handed to callers once a tunnel is up

use std::fmt;
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::prefixed::Prefixed;
use super::transport::Transport;
use crate::connect::Connection;
use crate::proxy::{HttpProxyClient, ProxyClient};

/// A CONNECT tunnel through an HTTP or HTTPS proxy.
///
/// Reads first return any bytes the proxy sent right after its response
/// head, then continue on the transport. Socket tuning always targets the
/// raw connection to the proxy, below any TLS layer.
pub struct TunnelConnection {
    stream: Prefixed<Transport>,
    client: HttpProxyClient,
    closed: bool,
}

impl TunnelConnection {
    pub(crate) fn new(stream: Prefixed<Transport>, client: HttpProxyClient) -> Self {
        Self {
            stream,
            client,
            closed: false,
        }
    }

    /// Whether the proxy hop is TLS protected.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.stream.get_ref().is_tls()
    }

    #[must_use]
    pub fn proxy(&self) -> &HttpProxyClient {
        &self.client
    }

    /// Tunnel bytes received with the proxy response and not yet read.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        self.stream.buffered()
    }

    fn raw(&self) -> &dyn Connection {
        self.stream.get_ref().raw()
    }
}

impl fmt::Debug for TunnelConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TunnelConnection")
            .field("proxy", &self.client.describe())
            .field("tls", &self.is_tls())
            .field("buffered", &self.buffered().len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Read for TunnelConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TunnelConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Connection for TunnelConnection {
    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.raw().local_addr()
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.raw().peer_addr()
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.stream.get_mut().raw_mut().set_deadline(deadline)
    }

    fn set_linger(&self, linger: Option<Duration>) -> io::Result<()> {
        self.raw().set_linger(linger)
    }

    fn set_nodelay(&self, nodelay: bool) -> io::Result<()> {
        self.raw().set_nodelay(nodelay)
    }

    fn set_read_buffer(&self, bytes: usize) -> io::Result<()> {
        self.raw().set_read_buffer(bytes)
    }

    fn set_write_buffer(&self, bytes: usize) -> io::Result<()> {
        self.raw().set_write_buffer(bytes)
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.stream.get_mut().close()
    }

    fn proxy_client(&self) -> Option<Arc<dyn ProxyClient>> {
        Some(Arc::new(self.client.clone()))
    }
}
