use super::BoxError;
use super::types::{Error, Kind};

/// Creates an `Error` for an invalid configuration.
pub fn config<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Config).with(e.into())
}

/// Creates an `Error` for a failed upstream dial.
pub fn connect<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Connect).with(e.into())
}

/// Creates an `Error` for a failed TLS handshake.
pub fn tls_handshake<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::TlsHandshake).with(e.into())
}

/// Creates an `Error` for a failed hostname verification.
pub fn tls_verification<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::TlsVerification).with(e.into())
}

pub fn request_build<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::RequestBuild).with(e.into())
}

pub fn write<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Write).with(e.into())
}

pub fn response_parse<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::ResponseParse).with(e.into())
}

/// Creates an `Error` for a non-200 CONNECT response, keeping the response.
pub fn tunnel_rejected(response: http::Response<bytes::Bytes>) -> Error {
    Error::new(Kind::TunnelRejected(Box::new(response)))
}

pub fn timeout() -> Error {
    Error::new(Kind::Timeout).with(super::helpers::TimedOut)
}

pub fn unsupported(reason: &'static str) -> Error {
    Error::new(Kind::Unsupported).with(super::helpers::UnsupportedNetwork(reason.into()))
}

pub fn unsupported_owned(reason: String) -> Error {
    Error::new(Kind::Unsupported).with(super::helpers::UnsupportedNetwork(reason))
}
