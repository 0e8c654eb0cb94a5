//! The stream a tunnel carries its bytes over

use std::io::{self, Read, Write};

use crate::connect::Connection;
use crate::tls::TlsStream;
use crate::tls::tls_manager::close_stream;

/// Plain upstream connection or TLS session to the proxy on top of one.
#[derive(Debug)]
pub enum Transport {
    Plain(Box<dyn Connection>),
    Tls(Box<TlsStream>),
}

impl Transport {
    /// The upstream connection underneath any TLS layer.
    pub fn raw(&self) -> &dyn Connection {
        match self {
            Transport::Plain(conn) => conn.as_ref(),
            Transport::Tls(tls) => tls.sock.as_ref(),
        }
    }

    pub fn raw_mut(&mut self) -> &mut dyn Connection {
        match self {
            Transport::Plain(conn) => conn.as_mut(),
            Transport::Tls(tls) => tls.sock.as_mut(),
        }
    }

    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self, Transport::Tls(_))
    }

    /// Close the TLS session, if any, and the upstream connection.
    pub fn close(&mut self) -> io::Result<()> {
        match self {
            Transport::Plain(conn) => conn.close(),
            Transport::Tls(tls) => {
                close_stream(tls);
                Ok(())
            }
        }
    }
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(conn) => conn.read(buf),
            Transport::Tls(tls) => tls.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(conn) => conn.write(buf),
            Transport::Tls(tls) => tls.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Transport::Plain(conn) => conn.flush(),
            Transport::Tls(tls) => tls.flush(),
        }
    }
}
