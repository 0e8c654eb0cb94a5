//! Stream connection abstraction
//!
//! A `Connection` is a blocking byte stream plus the handful of socket
//! controls a caller may need. Tunnels implement it too, which is what lets
//! a proxy client dial through another proxy client.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::proxy::ProxyClient;

pub trait Connection: Read + Write + Send + fmt::Debug {
    fn local_addr(&self) -> io::Result<SocketAddr>;

    fn peer_addr(&self) -> io::Result<SocketAddr>;

    /// Absolute deadline for all subsequent reads and writes; `None` clears it.
    ///
    /// Operations attempted after the deadline fail with
    /// `io::ErrorKind::TimedOut`.
    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()>;

    fn set_linger(&self, linger: Option<Duration>) -> io::Result<()>;

    fn set_nodelay(&self, nodelay: bool) -> io::Result<()>;

    fn set_read_buffer(&self, bytes: usize) -> io::Result<()>;

    fn set_write_buffer(&self, bytes: usize) -> io::Result<()>;

    /// Close the connection. Calling it again is a no-op.
    fn close(&mut self) -> io::Result<()>;

    /// The proxy client that produced this connection, `None` when direct.
    fn proxy_client(&self) -> Option<Arc<dyn ProxyClient>> {
        None
    }
}
