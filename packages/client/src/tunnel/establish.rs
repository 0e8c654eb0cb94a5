//! The CONNECT establishment sequence
//!
//! Dial the proxy through the upstream client, optionally wrap the
//! connection in TLS, send CONNECT, read the answer and assemble the
//! tunnel. Every failure closes whatever was opened so far.

use std::io::Write;
use std::time::Instant;

use http::StatusCode;

use super::connection::TunnelConnection;
use super::prefixed::Prefixed;
use super::request::{build_connect_request, encode_connect_request};
use super::response::read_response;
use super::transport::Transport;
use crate::error::{self, Result};
use crate::proxy::{HttpProxyClient, ProxyClient};
use crate::tls::tls_manager::close_stream;
use crate::tls::verify_peer_hostname;

pub(crate) fn establish(
    client: &HttpProxyClient,
    upstream: &dyn ProxyClient,
    network: &str,
    target: &str,
    deadline: Option<Instant>,
) -> Result<TunnelConnection> {
    let started = Instant::now();
    let proxy = client.address();

    let budget = match deadline {
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(started);
            if remaining.is_zero() {
                return Err(error::timeout().with_address(proxy));
            }
            remaining
        }
        None => std::time::Duration::ZERO,
    };

    let mut raw = upstream
        .dial_tcp_addr_timeout(network, proxy, budget)
        .map_err(|e| error::connect(e).with_address(proxy))?;
    tracing::trace!(proxy, via = %upstream.describe(), "upstream connection to proxy open");

    if deadline.is_some() {
        if let Err(e) = raw.set_deadline(deadline) {
            let _ = raw.close();
            return Err(error::connect(e).with_address(proxy));
        }
    }

    let mut transport = match client.tls() {
        Some(tls) => {
            let mut stream = tls
                .handshake(raw)
                .map_err(|e| error::tls_handshake(e).with_address(proxy))?;
            if !tls.insecure_skip_verify() {
                if let Err(e) = verify_peer_hostname(&stream.conn, client.verify_domain()) {
                    close_stream(&mut stream);
                    return Err(error::tls_verification(e).with_address(proxy));
                }
            }
            Transport::Tls(Box::new(stream))
        }
        None => Transport::Plain(raw),
    };

    let request = match build_connect_request(target, proxy, client.authorization()) {
        Ok(request) => request,
        Err(e) => {
            let _ = transport.close();
            return Err(e);
        }
    };

    let head = encode_connect_request(&request);
    if let Err(e) = transport.write_all(&head).and_then(|()| transport.flush()) {
        let _ = transport.close();
        return Err(error::write(e).with_address(proxy));
    }

    let (response, leftover) = match read_response(&mut transport) {
        Ok(parsed) => parsed,
        Err(e) => {
            let _ = transport.close();
            return Err(e.with_address(proxy));
        }
    };

    if response.status() != StatusCode::OK {
        let _ = transport.close();
        tracing::warn!(proxy, target, status = %response.status(), "proxy rejected CONNECT");
        return Err(error::tunnel_rejected(response).with_address(proxy));
    }

    if deadline.is_some() {
        if let Err(e) = transport.raw_mut().set_deadline(None) {
            let _ = transport.close();
            return Err(error::connect(e).with_address(proxy));
        }
    }

    tracing::debug!(
        proxy,
        target,
        kind = %client.kind(),
        leftover = leftover.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tunnel established"
    );

    Ok(TunnelConnection::new(
        Prefixed::new(leftover, transport),
        client.clone(),
    ))
}
