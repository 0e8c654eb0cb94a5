//! HTTP and HTTPS CONNECT proxy client

use std::fmt;
use std::net::{SocketAddr, UdpSocket};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use super::types::ProxyClient;
use crate::config::{ConfigurationError, ProxyConfig, ProxyKind, ResolvedConfig};
use crate::connect::{Connection, DirectProxyClient};
use crate::error::{self, Result};
use crate::tls::TlsManager;
use crate::tunnel::TunnelConnection;
use crate::tunnel::deadline::race;
use crate::tunnel::establish::establish;

/// Dials destinations through an HTTP or HTTPS forward proxy.
///
/// Clones share configuration and the upstream reference.
#[derive(Clone)]
pub struct HttpProxyClient {
    shared: Arc<Shared>,
}

struct Shared {
    config: ResolvedConfig,
    tls: Option<TlsManager>,
    upstream: RwLock<Arc<dyn ProxyClient>>,
}

impl HttpProxyClient {
    /// Create a client for the proxy at `address`.
    ///
    /// `kind` is `"http"` or `"https"` in any case, surrounding whitespace
    /// ignored. An empty `verify_domain` means the host part of `address`.
    /// Without an `upstream` the proxy is dialled directly.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown kind, an address with
    /// no host:port shape, or TLS settings that cannot be built.
    pub fn new(
        kind: &str,
        address: &str,
        verify_domain: &str,
        insecure_skip_verify: bool,
        upstream: Option<Arc<dyn ProxyClient>>,
    ) -> Result<Self> {
        let mut config = ProxyConfig::new(kind, address);
        config.verify_domain = Some(verify_domain.to_string());
        config.insecure_skip_verify = insecure_skip_verify;
        Self::from_config(&config, upstream)
    }

    /// # Errors
    ///
    /// Same as [`HttpProxyClient::new`], plus invalid root certificates.
    pub fn from_config(
        config: &ProxyConfig,
        upstream: Option<Arc<dyn ProxyClient>>,
    ) -> Result<Self> {
        let resolved = config
            .resolve()
            .map_err(|e| error::config(e).with_address(&config.address))?;
        Self::from_resolved(resolved, upstream)
    }

    /// # Errors
    ///
    /// Returns a configuration error if the TLS client cannot be set up or
    /// the default direct dialer cannot be created.
    pub fn from_resolved(
        config: ResolvedConfig,
        upstream: Option<Arc<dyn ProxyClient>>,
    ) -> Result<Self> {
        let upstream: Arc<dyn ProxyClient> = match upstream {
            Some(upstream) => upstream,
            None => Arc::new(DirectProxyClient::new("")?),
        };

        let tls = if config.kind.is_tls() {
            let manager = TlsManager::new(
                &config.verify_domain,
                config.insecure_skip_verify,
                &config.root_certificates,
            )
            .map_err(|e| error::config(e).with_address(&config.address))?;
            Some(manager)
        } else {
            None
        };

        tracing::debug!(
            proxy = %config.address,
            kind = %config.kind,
            verify_domain = %config.verify_domain,
            via = %upstream.describe(),
            "HTTP proxy client created"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                tls,
                upstream: RwLock::new(upstream),
            }),
        })
    }

    #[must_use]
    pub fn kind(&self) -> ProxyKind {
        self.shared.config.kind
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.shared.config.address
    }

    #[must_use]
    pub fn verify_domain(&self) -> &str {
        &self.shared.config.verify_domain
    }

    #[must_use]
    pub fn insecure_skip_verify(&self) -> bool {
        self.shared.config.insecure_skip_verify
    }

    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.shared.config
    }

    pub(crate) fn tls(&self) -> Option<&TlsManager> {
        self.shared.tls.as_ref()
    }

    pub(crate) fn authorization(&self) -> Option<&str> {
        self.shared.config.authorization.as_deref()
    }

    fn upstream(&self) -> Arc<dyn ProxyClient> {
        self.shared
            .upstream
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for HttpProxyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProxyClient")
            .field("config", &self.shared.config)
            .field("upstream", &self.upstream().describe())
            .finish()
    }
}

impl ProxyClient for HttpProxyClient {
    fn dial(&self, network: &str, address: &str) -> Result<Box<dyn Connection>> {
        let lower = network.to_ascii_lowercase();
        if lower.starts_with("tcp") {
            self.dial_tcp_addr(&lower, address)
        } else if lower.starts_with("udp") {
            Err(error::unsupported("proxy does not support UDP"))
        } else {
            Err(error::unsupported("unknown network type"))
        }
    }

    /// Uses the configured connect timeout, unbounded when it is zero.
    fn dial_tcp_addr(&self, network: &str, address: &str) -> Result<Box<dyn Connection>> {
        self.dial_tcp_addr_timeout(network, address, self.shared.config.connect_timeout)
    }

    fn dial_timeout(
        &self,
        network: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        match network {
            "tcp" | "tcp4" | "tcp6" => self.dial_tcp_addr_timeout(network, address, timeout),
            _ => Err(error::unsupported("unsupported network type")),
        }
    }

    fn dial_tcp(
        &self,
        network: &str,
        local: Option<SocketAddr>,
        remote: SocketAddr,
    ) -> Result<Box<dyn Connection>> {
        if let Some(local) = local {
            if local.port() != 0 || !local.ip().is_unspecified() {
                return Err(error::config(ConfigurationError::LocalBindUnsupported(local)));
            }
        }
        self.dial_tcp_addr(network, &remote.to_string())
    }

    fn dial_tcp_addr_timeout(
        &self,
        network: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>> {
        let deadline = (!timeout.is_zero()).then(|| Instant::now() + timeout);
        let upstream = self.upstream();
        tracing::debug!(
            proxy = %self.address(),
            target = address,
            timeout_ms = timeout.as_millis() as u64,
            "dialing through proxy"
        );

        let client = self.clone();
        let network = network.to_string();
        let target = address.to_string();
        let tunnel = race(
            deadline,
            move |deadline| establish(&client, upstream.as_ref(), &network, &target, deadline),
            |mut late: TunnelConnection| {
                tracing::warn!(
                    proxy = %late.proxy().address(),
                    "closing tunnel established after timeout"
                );
                let _ = late.close();
            },
        )
        .map_err(|e| {
            if matches!(e.kind(), error::Kind::Timeout) && e.address().is_none() {
                e.with_address(self.address())
            } else {
                e
            }
        })?;

        Ok(Box::new(tunnel))
    }

    fn dial_udp(
        &self,
        _network: &str,
        _local: Option<SocketAddr>,
        _remote: SocketAddr,
    ) -> Result<UdpSocket> {
        Err(error::unsupported_owned(format!(
            "{} proxy does not support UDP forwarding",
            self.kind()
        )))
    }

    fn up_proxy(&self) -> Option<Arc<dyn ProxyClient>> {
        Some(self.upstream())
    }

    fn set_up_proxy(&self, upstream: Arc<dyn ProxyClient>) -> Result<()> {
        tracing::debug!(proxy = %self.address(), via = %upstream.describe(), "upstream replaced");
        *self
            .shared
            .upstream
            .write()
            .unwrap_or_else(PoisonError::into_inner) = upstream;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{}://{}", self.kind(), self.address())
    }
}
