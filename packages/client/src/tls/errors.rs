//! TLS-specific error types for detailed error handling

/// TLS-specific error types for detailed error handling
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("invalid TLS server name {0:?}")]
    InvalidServerName(String),
    #[error("TLS configuration failed: {0}")]
    Config(#[from] rustls::Error),
    #[error("certificate verifier setup failed: {0}")]
    Verifier(#[from] rustls::client::VerifierBuilderError),
    #[error("TLS handshake failed: {0}")]
    Handshake(std::io::Error),
    #[error("proxy presented no certificate")]
    NoPeerCertificate,
    #[error("certificate parsing failed: {0}")]
    CertificateParsing(String),
    #[error("certificate is valid for {presented:?}, not {domain}")]
    HostnameMismatch { domain: String, presented: Vec<String> },
}
