//! Buffered CONNECT response parsing
//!
//! The proxy's response head is read through a buffer, so the last read may
//! pull in bytes that already belong to the tunnel. Those are handed back
//! as leftover instead of being dropped.

use std::io::{self, Read};

use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue};
use http::{Response, StatusCode, Version};

use crate::error::{self, Result};

const READ_CHUNK: usize = 4096;
const MAX_HEAD_BYTES: usize = 64 * 1024;
const MAX_HEADERS: usize = 100;

/// Read one HTTP/1.x response head.
///
/// Returns the response (its body holds whatever followed the head in the
/// buffer) and the same trailing bytes as leftover for the tunnel.
pub fn read_response<R: Read + ?Sized>(reader: &mut R) -> Result<(Response<Bytes>, Bytes)> {
    let mut buf = BytesMut::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        if !buf.is_empty() {
            if let Some((head, len)) = parse_head(&buf)? {
                let leftover = buf.split_off(len).freeze();
                let (parts, ()) = head.into_parts();
                return Ok((Response::from_parts(parts, leftover.clone()), leftover));
            }
        }

        if buf.len() >= MAX_HEAD_BYTES {
            return Err(error::response_parse(format!(
                "response head exceeds {MAX_HEAD_BYTES} bytes"
            )));
        }

        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(error::response_parse(e)),
        };
        if n == 0 {
            return Err(error::response_parse(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "proxy closed the connection before a complete response",
            )));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn parse_head(buf: &[u8]) -> Result<Option<(Response<()>, usize)>> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut parsed = httparse::Response::new(&mut headers);

    let len = match parsed.parse(buf).map_err(error::response_parse)? {
        httparse::Status::Complete(len) => len,
        httparse::Status::Partial => return Ok(None),
    };

    let version = match parsed.version {
        Some(0) => Version::HTTP_10,
        _ => Version::HTTP_11,
    };
    let code = parsed
        .code
        .ok_or_else(|| error::response_parse("missing status code"))?;
    let status = StatusCode::from_u16(code).map_err(error::response_parse)?;

    let mut response = Response::builder().status(status).version(version);
    for header in parsed.headers.iter() {
        let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(error::response_parse)?;
        let value = HeaderValue::from_bytes(header.value).map_err(error::response_parse)?;
        response = response.header(name, value);
    }

    let response = response.body(()).map_err(error::response_parse)?;
    Ok(Some((response, len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn bytes_after_the_head_become_leftover() {
        let mut wire = Cursor::new(b"HTTP/1.1 200 OK\r\n\r\nPAYLOAD".to_vec());
        let (response, leftover) = read_response(&mut wire).expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&leftover[..], b"PAYLOAD");
    }

    #[test]
    fn head_split_across_reads_is_reassembled() {
        let mut wire = Trickle {
            data: b"HTTP/1.0 200 Connection established\r\nProxy-Agent: test\r\n\r\nxy",
            step: 3,
        };
        let (response, leftover) = read_response(&mut wire).expect("response");
        assert_eq!(response.version(), Version::HTTP_10);
        assert_eq!(response.headers()["proxy-agent"], "test");
        assert!(leftover.len() <= 2);
    }

    #[test]
    fn rejection_keeps_headers_for_diagnostics() {
        let mut wire = Cursor::new(
            concat!(
                "HTTP/1.1 407 Proxy Authentication Required\r\n",
                "Proxy-Authenticate: Basic realm=\"p\"\r\n\r\n",
            )
            .as_bytes()
            .to_vec(),
        );
        let (response, leftover) = read_response(&mut wire).expect("response");
        assert_eq!(response.status(), StatusCode::PROXY_AUTHENTICATION_REQUIRED);
        assert!(response.headers().contains_key("proxy-authenticate"));
        assert!(leftover.is_empty());
    }

    #[test]
    fn truncated_head_is_a_parse_error() {
        let mut wire = Cursor::new(b"HTTP/1.1 200 OK\r\n".to_vec());
        let err = read_response(&mut wire).unwrap_err();
        assert!(matches!(err.kind(), crate::error::Kind::ResponseParse));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let mut wire = Cursor::new(b"SSH-2.0-OpenSSH_9.6\r\n\r\n".to_vec());
        let err = read_response(&mut wire).unwrap_err();
        assert!(matches!(err.kind(), crate::error::Kind::ResponseParse));
    }

    #[test]
    fn oversized_head_is_rejected() {
        let mut data = b"HTTP/1.1 200 OK\r\n".to_vec();
        while data.len() <= MAX_HEAD_BYTES {
            data.extend_from_slice(b"X-Filler: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n");
        }
        let mut wire = Cursor::new(data);
        assert!(read_response(&mut wire).is_err());
    }
}
