//! Loopback mock proxies and instrumented upstream dialers
#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tunnelchain_client::error;
use tunnelchain_client::{Connection, DirectProxyClient, ProxyClient, Result};

/// Read a request head up to and including the blank line.
pub fn read_head<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        if reader.read(&mut byte)? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        head.push(byte[0]);
    }
    Ok(String::from_utf8_lossy(&head).into_owned())
}

/// The `CONNECT` target of a request head.
pub fn connect_target(head: &str) -> String {
    head.split_whitespace().nth(1).unwrap_or_default().to_string()
}

/// One-shot proxy: answers the first CONNECT with `reply`, then echoes.
pub struct MockProxy {
    pub addr: SocketAddr,
    handle: JoinHandle<io::Result<String>>,
}

impl MockProxy {
    pub fn spawn(reply: &'static [u8]) -> Self {
        Self::spawn_with(move |stream, _head| {
            stream.write_all(reply)?;
            echo(stream)
        })
    }

    /// Accepts and reads the request but never answers.
    pub fn silent() -> Self {
        Self::spawn_with(|stream, _head| {
            let mut sink = Vec::new();
            let _ = stream.read_to_end(&mut sink);
            Ok(())
        })
    }

    /// Opens the requested target and relays bytes both ways.
    pub fn forwarding() -> Self {
        Self::spawn_with(|stream, head| {
            let upstream = TcpStream::connect(connect_target(head))?;
            stream.write_all(b"HTTP/1.1 200 Connection established\r\n\r\n")?;
            relay(stream.try_clone()?, upstream)
        })
    }

    fn spawn_with<F>(serve: F) -> Self
    where
        F: FnOnce(&mut TcpStream, &str) -> io::Result<()> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock proxy");
        let addr = listener.local_addr().expect("mock proxy addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept()?;
            let head = read_head(&mut stream)?;
            let _ = serve(&mut stream, &head);
            Ok(head)
        });
        Self { addr, handle }
    }

    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Wait for the proxy thread and return the request head it received.
    pub fn join(self) -> String {
        self.handle
            .join()
            .expect("mock proxy panicked")
            .expect("mock proxy io")
    }
}

fn echo(stream: &mut TcpStream) -> io::Result<()> {
    let mut buf = [0u8; 1024];
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Ok(());
        }
        stream.write_all(&buf[..n])?;
    }
}

fn relay(client: TcpStream, upstream: TcpStream) -> io::Result<()> {
    let mut client_read = client.try_clone()?;
    let mut upstream_write = upstream.try_clone()?;
    let forward = thread::spawn(move || {
        let _ = io::copy(&mut client_read, &mut upstream_write);
        let _ = upstream_write.shutdown(std::net::Shutdown::Write);
    });
    let mut upstream_read = upstream;
    let mut client_write = client;
    let _ = io::copy(&mut upstream_read, &mut client_write);
    let _ = client_write.shutdown(std::net::Shutdown::Write);
    let _ = forward.join();
    Ok(())
}

/// Plain TCP server that writes `greeting` to its first client, then echoes.
pub fn spawn_destination(greeting: &'static [u8]) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind destination");
    let addr = listener.local_addr().expect("destination addr");
    let handle = thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = stream.write_all(greeting);
            let _ = echo(&mut stream);
        }
    });
    (addr, handle)
}

/// Direct dialer whose connections report when they are closed.
#[derive(Debug, Default)]
pub struct RecordingUpstream {
    direct: DirectProxyClient,
    pub closed: Arc<AtomicBool>,
}

impl RecordingUpstream {
    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct Observed {
    inner: Box<dyn Connection>,
    closed: Arc<AtomicBool>,
}

impl Read for Observed {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for Observed {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Connection for Observed {
    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.inner.peer_addr()
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.inner.set_deadline(deadline)
    }

    fn set_linger(&self, linger: Option<Duration>) -> io::Result<()> {
        self.inner.set_linger(linger)
    }

    fn set_nodelay(&self, nodelay: bool) -> io::Result<()> {
        self.inner.set_nodelay(nodelay)
    }

    fn set_read_buffer(&self, bytes: usize) -> io::Result<()> {
        self.inner.set_read_buffer(bytes)
    }

    fn set_write_buffer(&self, bytes: usize) -> io::Result<()> {
        self.inner.set_write_buffer(bytes)
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.inner.close()
    }
}

impl ProxyClient for RecordingUpstream {
    fn dial(&self, network: &str, address: &str) -> Result<Box<dyn Connection>> {
        self.dial_tcp_addr_timeout(network, address, Duration::ZERO)
    }

    fn dial_timeout(
        &self,
        network: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        self.dial_tcp_addr_timeout(network, address, timeout)
    }

    fn dial_tcp(
        &self,
        network: &str,
        _local: Option<SocketAddr>,
        remote: SocketAddr,
    ) -> Result<Box<dyn Connection>> {
        self.dial_tcp_addr_timeout(network, &remote.to_string(), Duration::ZERO)
    }

    fn dial_tcp_addr_timeout(
        &self,
        network: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        let inner = self.direct.dial_tcp_addr_timeout(network, address, timeout)?;
        Ok(Box::new(Observed {
            inner,
            closed: self.closed.clone(),
        }))
    }

    fn dial_udp(
        &self,
        network: &str,
        local: Option<SocketAddr>,
        remote: SocketAddr,
    ) -> Result<UdpSocket> {
        self.direct.dial_udp(network, local, remote)
    }

    fn up_proxy(&self) -> Option<Arc<dyn ProxyClient>> {
        None
    }

    fn set_up_proxy(&self, _upstream: Arc<dyn ProxyClient>) -> Result<()> {
        Err(error::unsupported("recording upstream has no upstream"))
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

/// Upstream dialer that never returns from a dial.
#[derive(Debug, Default)]
pub struct BlockingUpstream;

impl BlockingUpstream {
    fn block() -> ! {
        loop {
            thread::park();
        }
    }
}

impl ProxyClient for BlockingUpstream {
    fn dial(&self, _network: &str, _address: &str) -> Result<Box<dyn Connection>> {
        Self::block()
    }

    fn dial_timeout(
        &self,
        _network: &str,
        _address: &str,
        _timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        Self::block()
    }

    fn dial_tcp(
        &self,
        _network: &str,
        _local: Option<SocketAddr>,
        _remote: SocketAddr,
    ) -> Result<Box<dyn Connection>> {
        Self::block()
    }

    fn dial_tcp_addr_timeout(
        &self,
        _network: &str,
        _address: &str,
        _timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        Self::block()
    }

    fn dial_udp(
        &self,
        _network: &str,
        _local: Option<SocketAddr>,
        _remote: SocketAddr,
    ) -> Result<UdpSocket> {
        Err(error::unsupported("blocking upstream has no UDP"))
    }

    fn up_proxy(&self) -> Option<Arc<dyn ProxyClient>> {
        None
    }

    fn set_up_proxy(&self, _upstream: Arc<dyn ProxyClient>) -> Result<()> {
        Err(error::unsupported("blocking upstream has no upstream"))
    }

    fn describe(&self) -> String {
        "blocking".to_string()
    }
}
