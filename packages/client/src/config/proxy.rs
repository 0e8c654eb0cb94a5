//! Proxy settings and their validated form

use std::fmt;
use std::time::Duration;

use base64::Engine;
use rustls::pki_types::CertificateDer;
use serde::{Deserialize, Serialize};

use super::kind::ProxyKind;
use super::validation::{ConfigResult, ConfigurationError};
use crate::connect::addr::split_host_port;

/// Settings for one HTTP/HTTPS CONNECT proxy.
///
/// `kind` is kept as the raw token so that it goes through the same
/// normalization whether it comes from code or from a configuration file.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// `"http"` or `"https"`, surrounding whitespace and case are ignored
    pub kind: String,
    /// Proxy address as `host:port`
    pub address: String,
    /// Name checked against the proxy certificate, defaults to the address host
    #[serde(default)]
    pub verify_domain: Option<String>,
    #[serde(default)]
    pub insecure_skip_verify: bool,
    #[serde(default)]
    pub basic_auth: Option<BasicAuth>,
    /// Extra PEM encoded CA certificates trusted for HTTPS proxies
    #[serde(default)]
    pub root_certificates: Vec<String>,
    /// Default budget for `dial`, zero or absent means unbounded
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
}

/// Credentials sent as `Proxy-Authorization: Basic ...`
#[derive(Clone, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value for the `Proxy-Authorization` header
    #[must_use]
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("kind", &self.kind)
            .field("address", &self.address)
            .field("verify_domain", &self.verify_domain)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("basic_auth", &self.basic_auth)
            .field("root_certificates", &self.root_certificates.len())
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}

impl ProxyConfig {
    pub fn new(kind: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            address: address.into(),
            verify_domain: None,
            insecure_skip_verify: false,
            basic_auth: None,
            root_certificates: Vec::new(),
            connect_timeout_ms: None,
        }
    }

    /// Parse a single proxy entry from JSON
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Document` if the JSON does not describe a proxy.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalize and validate the settings.
    ///
    /// # Errors
    ///
    /// - `InvalidKind` if the kind token is not http or https
    /// - `InvalidAddress` if no verification domain is given and the
    ///   address cannot be split into host and port
    /// - `InvalidCertificate` if a root certificate is not valid PEM
    pub fn resolve(&self) -> ConfigResult<ResolvedConfig> {
        let kind: ProxyKind = self.kind.parse()?;

        let verify_domain = match self.verify_domain.as_deref() {
            Some(domain) if !domain.is_empty() => domain.to_string(),
            _ => {
                let (host, _port) = split_host_port(&self.address).map_err(|reason| {
                    ConfigurationError::InvalidAddress {
                        address: self.address.clone(),
                        reason,
                    }
                })?;
                host.to_string()
            }
        };

        let mut root_certificates = Vec::new();
        for pem_text in &self.root_certificates {
            root_certificates.extend(parse_pem_certificates(pem_text)?);
        }

        Ok(ResolvedConfig {
            kind,
            address: self.address.clone(),
            verify_domain,
            insecure_skip_verify: self.insecure_skip_verify,
            authorization: self.basic_auth.as_ref().map(BasicAuth::header_value),
            root_certificates,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms.unwrap_or(0)),
        })
    }
}

fn parse_pem_certificates(pem_text: &str) -> ConfigResult<Vec<CertificateDer<'static>>> {
    let blocks = pem::parse_many(pem_text)
        .map_err(|e| ConfigurationError::InvalidCertificate(e.to_string()))?;

    let certificates: Vec<_> = blocks
        .into_iter()
        .filter(|block| block.tag() == "CERTIFICATE")
        .map(|block| CertificateDer::from(block.into_contents()))
        .collect();

    if certificates.is_empty() {
        return Err(ConfigurationError::InvalidCertificate(
            "no CERTIFICATE block found".to_string(),
        ));
    }
    Ok(certificates)
}

/// Validated proxy settings, immutable once built.
#[derive(Clone)]
pub struct ResolvedConfig {
    pub kind: ProxyKind,
    pub address: String,
    pub verify_domain: String,
    pub insecure_skip_verify: bool,
    pub(crate) authorization: Option<String>,
    pub root_certificates: Vec<CertificateDer<'static>>,
    /// Zero means unbounded
    pub connect_timeout: Duration,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("kind", &self.kind)
            .field("address", &self.address)
            .field("verify_domain", &self.verify_domain)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("root_certificates", &self.root_certificates.len())
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
