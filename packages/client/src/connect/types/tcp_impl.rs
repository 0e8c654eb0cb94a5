//! Raw TCP connection with absolute deadlines
//!
//! `std::net::TcpStream` only knows relative timeouts, so the deadline is
//! stored and turned into a socket timeout right before each operation.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use super::connection::Connection;
use crate::connect::tcp::socket_config;

#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    deadline: Option<Instant>,
    /// Whether a socket timeout may currently be installed
    timeouts_armed: bool,
    closed: bool,
}

impl TcpConnection {
    #[must_use]
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            deadline: None,
            timeouts_armed: false,
            closed: false,
        }
    }

    #[must_use]
    pub fn get_ref(&self) -> &TcpStream {
        &self.stream
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Socket timeout for the next operation, or an error if none is left.
    fn remaining(&self) -> io::Result<Option<Duration>> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "connection closed"));
        }
        match self.deadline {
            None => Ok(None),
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    Err(io::Error::new(io::ErrorKind::TimedOut, "i/o deadline exceeded"))
                } else {
                    Ok(Some(remaining))
                }
            }
        }
    }

    fn arm_read(&mut self) -> io::Result<()> {
        let remaining = self.remaining()?;
        if remaining.is_some() || self.timeouts_armed {
            self.stream.set_read_timeout(remaining)?;
            self.timeouts_armed = remaining.is_some();
        }
        Ok(())
    }

    fn arm_write(&mut self) -> io::Result<()> {
        let remaining = self.remaining()?;
        if remaining.is_some() || self.timeouts_armed {
            self.stream.set_write_timeout(remaining)?;
            self.timeouts_armed = remaining.is_some();
        }
        Ok(())
    }
}

impl From<TcpStream> for TcpConnection {
    fn from(stream: TcpStream) -> Self {
        Self::new(stream)
    }
}

impl Read for TcpConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.arm_read()?;
        self.stream.read(buf)
    }
}

impl Write for TcpConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.arm_write()?;
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Connection for TcpConnection {
    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.deadline = deadline;
        if deadline.is_none() && self.timeouts_armed {
            self.stream.set_read_timeout(None)?;
            self.stream.set_write_timeout(None)?;
            self.timeouts_armed = false;
        }
        Ok(())
    }

    fn set_linger(&self, linger: Option<Duration>) -> io::Result<()> {
        socket_config::set_linger(&self.stream, linger)
    }

    fn set_nodelay(&self, nodelay: bool) -> io::Result<()> {
        socket_config::set_nodelay(&self.stream, nodelay)
    }

    fn set_read_buffer(&self, bytes: usize) -> io::Result<()> {
        socket_config::set_read_buffer(&self.stream, bytes)
    }

    fn set_write_buffer(&self, bytes: usize) -> io::Result<()> {
        socket_config::set_write_buffer(&self.stream, bytes)
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn pair() -> (TcpConnection, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let client = TcpStream::connect(listener.local_addr().expect("addr")).expect("connect");
        let (server, _) = listener.accept().expect("accept");
        (TcpConnection::new(client), server)
    }

    #[test]
    fn elapsed_deadline_fails_without_blocking() {
        let (mut conn, _server) = pair();
        conn.set_deadline(Some(Instant::now())).expect("deadline");
        let mut buf = [0u8; 8];
        let err = conn.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn deadline_unblocks_a_hung_read() {
        let (mut conn, _server) = pair();
        let started = Instant::now();
        conn.set_deadline(Some(started + Duration::from_millis(30)))
            .expect("deadline");
        let mut buf = [0u8; 8];
        assert!(conn.read(&mut buf).is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn cleared_deadline_allows_reads() {
        let (mut conn, mut server) = pair();
        conn.set_deadline(Some(Instant::now() + Duration::from_secs(5)))
            .expect("deadline");
        conn.set_deadline(None).expect("clear");
        server.write_all(b"ok").expect("write");
        let mut buf = [0u8; 2];
        conn.read_exact(&mut buf).expect("read");
        assert_eq!(&buf, b"ok");
    }

    #[test]
    fn close_is_idempotent_and_observable() {
        let (mut conn, mut server) = pair();
        conn.close().expect("first close");
        conn.close().expect("second close");
        assert!(conn.is_closed());
        let mut buf = [0u8; 1];
        assert_eq!(server.read(&mut buf).expect("eof"), 0);
        assert_eq!(
            conn.write(b"x").unwrap_err().kind(),
            io::ErrorKind::NotConnected
        );
    }

    #[test]
    fn socket_tuning_reaches_the_socket() {
        let (conn, _server) = pair();
        conn.set_nodelay(true).expect("nodelay");
        assert!(conn.get_ref().nodelay().expect("read nodelay"));
        conn.set_linger(Some(Duration::from_secs(1))).expect("linger");
        conn.set_read_buffer(64 * 1024).expect("rcvbuf");
        conn.set_write_buffer(64 * 1024).expect("sndbuf");
    }
}
