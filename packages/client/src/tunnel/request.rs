//! CONNECT request construction and serialization

use http::header::{HOST, HeaderValue, PROXY_AUTHORIZATION};
use http::{Method, Request, Uri, Version};

use crate::error::{self, Result};

/// Build a CONNECT request for `target` addressed to the proxy at `proxy`.
///
/// The request target is the destination in authority form; the `Host`
/// header names the proxy.
pub fn build_connect_request(
    target: &str,
    proxy: &str,
    authorization: Option<&str>,
) -> Result<Request<()>> {
    let uri: Uri = target
        .parse()
        .map_err(|e| error::request_build(e).with_address(target))?;
    if uri.scheme().is_some() || uri.authority().is_none() {
        return Err(error::request_build("CONNECT target must be host:port").with_address(target));
    }

    let mut builder = Request::builder()
        .method(Method::CONNECT)
        .uri(uri)
        .version(Version::HTTP_11)
        .header(HOST, HeaderValue::from_str(proxy).map_err(error::request_build)?);
    if let Some(authorization) = authorization {
        let mut value = HeaderValue::from_str(authorization).map_err(error::request_build)?;
        value.set_sensitive(true);
        builder = builder.header(PROXY_AUTHORIZATION, value);
    }

    builder.body(()).map_err(error::request_build)
}

/// Serialize a CONNECT request head as HTTP/1.1.
#[must_use]
pub fn encode_connect_request(request: &Request<()>) -> Vec<u8> {
    let target = request
        .uri()
        .authority()
        .map_or_else(|| request.uri().to_string(), ToString::to_string);

    let mut head = Vec::with_capacity(128);
    head.extend_from_slice(b"CONNECT ");
    head.extend_from_slice(target.as_bytes());
    head.extend_from_slice(b" HTTP/1.1\r\n");
    for (name, value) in request.headers() {
        head.extend_from_slice(name.as_str().as_bytes());
        head.extend_from_slice(b": ");
        head.extend_from_slice(value.as_bytes());
        head.extend_from_slice(b"\r\n");
    }
    head.extend_from_slice(b"\r\n");
    head
}
