//! TCP socket configuration utilities
//!
//! Kernel-level options shared by every connection type. They always act
//! on the raw socket, never on a TLS layer above it.

use std::io;
use std::net::TcpStream;
use std::time::Duration;

use socket2::SockRef;

/// Set `SO_LINGER`; `None` restores the default close behaviour.
pub fn set_linger(stream: &TcpStream, linger: Option<Duration>) -> io::Result<()> {
    SockRef::from(stream).set_linger(linger)
}

/// Set `TCP_NODELAY`.
#[inline]
pub fn set_nodelay(stream: &TcpStream, nodelay: bool) -> io::Result<()> {
    stream.set_nodelay(nodelay)
}

/// Set `SO_RCVBUF`.
pub fn set_read_buffer(stream: &TcpStream, bytes: usize) -> io::Result<()> {
    SockRef::from(stream).set_recv_buffer_size(bytes)
}

/// Set `SO_SNDBUF`.
pub fn set_write_buffer(stream: &TcpStream, bytes: usize) -> io::Result<()> {
    SockRef::from(stream).set_send_buffer_size(bytes)
}
