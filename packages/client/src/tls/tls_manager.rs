//! TLS client setup for HTTPS proxies
//!
//! One `TlsManager` is built per proxy client; it owns the rustls client
//! configuration and drives the blocking handshake over whatever upstream
//! connection the dialer produced.

use std::fmt;
use std::sync::Arc;

use rustls::client::WebPkiServerVerifier;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use super::errors::TlsError;
use super::verifier::{DeferredNameVerifier, SkipVerification};
use crate::connect::Connection;

/// TLS stream to the proxy over the raw upstream connection.
pub type TlsStream = StreamOwned<ClientConnection, Box<dyn Connection>>;

#[derive(Clone)]
pub struct TlsManager {
    config: Arc<ClientConfig>,
    server_name: ServerName<'static>,
    insecure_skip_verify: bool,
}

impl fmt::Debug for TlsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsManager")
            .field("server_name", &self.server_name)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

impl TlsManager {
    /// Build the client configuration for proxies verified as `domain`.
    ///
    /// The bundled webpki roots are always trusted; `extra_roots` are added
    /// on top of them.
    pub fn new(
        domain: &str,
        insecure_skip_verify: bool,
        extra_roots: &[CertificateDer<'static>],
    ) -> Result<Self, TlsError> {
        let server_name = ServerName::try_from(domain.to_string())
            .map_err(|_| TlsError::InvalidServerName(domain.to_string()))?;

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()?;

        let config = if insecure_skip_verify {
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(SkipVerification::new(provider)))
                .with_no_client_auth()
        } else {
            let mut root_store = RootCertStore::empty();
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            for cert in extra_roots {
                root_store.add(cert.clone())?;
            }
            tracing::debug!("TLS trust store holds {} roots", root_store.len());

            let webpki =
                WebPkiServerVerifier::builder_with_provider(Arc::new(root_store), provider)
                    .build()?;
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(DeferredNameVerifier::new(webpki)))
                .with_no_client_auth()
        };

        Ok(Self {
            config: Arc::new(config),
            server_name,
            insecure_skip_verify,
        })
    }

    #[must_use]
    pub fn insecure_skip_verify(&self) -> bool {
        self.insecure_skip_verify
    }

    /// Run the client handshake to completion over `raw`.
    ///
    /// On failure the raw connection has already been closed.
    pub fn handshake(&self, mut raw: Box<dyn Connection>) -> Result<TlsStream, TlsError> {
        let conn = match ClientConnection::new(self.config.clone(), self.server_name.clone()) {
            Ok(conn) => conn,
            Err(e) => {
                let _ = raw.close();
                return Err(TlsError::Config(e));
            }
        };

        let mut stream = StreamOwned::new(conn, raw);
        while stream.conn.is_handshaking() {
            if let Err(e) = stream.conn.complete_io(&mut stream.sock) {
                close_stream(&mut stream);
                return Err(TlsError::Handshake(e));
            }
        }

        tracing::trace!(
            server_name = ?self.server_name,
            version = ?stream.conn.protocol_version(),
            "TLS handshake with proxy complete"
        );
        Ok(stream)
    }
}

/// Send close_notify best-effort, then close the raw connection.
pub(crate) fn close_stream(stream: &mut TlsStream) {
    stream.conn.send_close_notify();
    let _ = stream.conn.complete_io(&mut stream.sock);
    let _ = stream.sock.close();
}
