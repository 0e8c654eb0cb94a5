use std::error::Error as StdError;
use std::fmt;

use bytes::Bytes;

/// A Result alias where the Err case is `tunnelchain_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while dialing through a proxy.
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    /// Proxy or destination address the failure relates to.
    pub address: Option<String>,
}

#[derive(Debug)]
pub enum Kind {
    /// Invalid proxy kind, malformed proxy address or unsupported local bind
    Config,
    /// The upstream transport to the proxy could not be opened
    Connect,
    /// TLS client handshake with the proxy failed
    TlsHandshake,
    /// Post-handshake hostname verification failed
    TlsVerification,
    /// The CONNECT request could not be built
    RequestBuild,
    /// The CONNECT request could not be written
    Write,
    /// The proxy response was not a valid HTTP/1.x response
    ResponseParse,
    /// The proxy answered with a status other than 200
    TunnelRejected(Box<http::Response<Bytes>>),
    /// The dial budget was exhausted
    Timeout,
    /// Datagram or unrecognized network requested
    Unsupported,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                address: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.inner.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Address the error relates to, if any
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.inner.address.as_deref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("tunnelchain::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref address) = self.inner.address {
            f.field("address", address);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Config => f.write_str("proxy configuration error")?,
            Kind::Connect => f.write_str("cannot connect to proxy")?,
            Kind::TlsHandshake => f.write_str("TLS handshake with proxy failed")?,
            Kind::TlsVerification => f.write_str("TLS hostname verification failed")?,
            Kind::RequestBuild => f.write_str("error building CONNECT request")?,
            Kind::Write => f.write_str("error writing CONNECT request")?,
            Kind::ResponseParse => f.write_str("malformed proxy response")?,
            Kind::TunnelRejected(response) => {
                let status = response.status();
                write!(f, "proxy rejected tunnel ({status})")?;
            }
            Kind::Timeout => f.write_str("proxy dial timed out")?,
            Kind::Unsupported => f.write_str("unsupported network")?,
        }

        if let Some(ref address) = self.inner.address {
            write!(f, " [{address}]")?;
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        let kind = match error.kind() {
            Kind::Timeout => std::io::ErrorKind::TimedOut,
            Kind::Unsupported => std::io::ErrorKind::Unsupported,
            Kind::Config => std::io::ErrorKind::InvalidInput,
            Kind::Connect => std::io::ErrorKind::ConnectionRefused,
            _ => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, error)
    }
}
