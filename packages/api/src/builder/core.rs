//! Core `Tunnel` builder structure and its settings

use std::sync::Arc;
use std::time::Duration;

use tunnelchain_client::{HttpProxyClient, ProxyClient, ProxyConfig, Result};

/// Fluent builder for one proxy hop.
///
/// ```no_run
/// use std::time::Duration;
/// use tunnelchain::Tunnel;
///
/// let conn = Tunnel::https("proxy.example.com:8443")
///     .basic_auth("user", "secret")
///     .connect_timeout(Duration::from_secs(5))
///     .dial("example.com:443");
/// ```
#[derive(Clone, Debug)]
pub struct Tunnel {
    pub(crate) config: ProxyConfig,
    pub(crate) upstream: Option<Arc<dyn ProxyClient>>,
}

impl Tunnel {
    /// Start from a kind token (`"http"` or `"https"`) and proxy address.
    #[must_use]
    pub fn new(kind: &str, address: &str) -> Self {
        Self::from_config(ProxyConfig::new(kind, address))
    }

    #[must_use]
    pub fn from_config(config: ProxyConfig) -> Self {
        Self {
            config,
            upstream: None,
        }
    }

    /// Plain HTTP proxy at `address`.
    #[must_use]
    pub fn http(address: &str) -> Self {
        Self::new("http", address)
    }

    /// TLS-wrapped proxy at `address`.
    #[must_use]
    pub fn https(address: &str) -> Self {
        Self::new("https", address)
    }

    /// Name to verify the proxy certificate against. Defaults to the host
    /// part of the proxy address.
    #[must_use]
    pub fn verify_domain(mut self, domain: &str) -> Self {
        self.config.verify_domain = Some(domain.to_string());
        self
    }

    #[must_use]
    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.config.insecure_skip_verify = skip;
        self
    }

    /// Trust the CA certificates in `pem` in addition to the bundled roots.
    #[must_use]
    pub fn root_certificate_pem(mut self, pem: &str) -> Self {
        self.config.root_certificates.push(pem.to_string());
        self
    }

    /// Budget for dials that do not pass their own timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.config.connect_timeout_ms = Some(millis);
        self
    }

    /// Reach this proxy through `upstream` instead of dialling it directly.
    #[must_use]
    pub fn through(mut self, upstream: Arc<dyn ProxyClient>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Validate the settings and create the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown kind, a malformed
    /// address or unusable certificates.
    pub fn build(self) -> Result<HttpProxyClient> {
        let client = HttpProxyClient::from_config(&self.config, self.upstream)?;
        tracing::debug!(proxy = %client.describe(), "tunnel client built");
        Ok(client)
    }
}
