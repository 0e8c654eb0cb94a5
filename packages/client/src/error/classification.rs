use std::error::Error as StdError;
use std::io;

use bytes::Bytes;

use super::helpers::TimedOut;
use super::types::{Error, Kind};

impl Error {
    /// Returns true if the error comes from configuration or construction.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self.inner.kind, Kind::Config)
    }

    /// Returns true if the upstream transport could not be opened.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self.inner.kind, Kind::Connect)
    }

    /// Returns true for TLS handshake or hostname verification failures.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self.inner.kind, Kind::TlsHandshake | Kind::TlsVerification)
    }

    /// Returns true for failures of the CONNECT exchange itself.
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(
            self.inner.kind,
            Kind::RequestBuild | Kind::Write | Kind::ResponseParse | Kind::TunnelRejected(_)
        )
    }

    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self.inner.kind, Kind::Unsupported)
    }

    /// Returns true if the error is related to a timeout.
    ///
    /// Besides the dial budget itself, an I/O timeout anywhere in the source
    /// chain (for example the transport deadline firing mid-handshake)
    /// counts as well.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        if matches!(self.inner.kind, Kind::Timeout) {
            return true;
        }

        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<TimedOut>() {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if matches!(io.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
                    return true;
                }
            }
            source = err.source();
        }

        false
    }

    /// Returns the status code of a rejected tunnel.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        self.response().map(http::Response::status)
    }

    /// The full proxy response of a rejected tunnel.
    #[must_use]
    pub fn response(&self) -> Option<&http::Response<Bytes>> {
        match &self.inner.kind {
            Kind::TunnelRejected(response) => Some(response),
            _ => None,
        }
    }
}
