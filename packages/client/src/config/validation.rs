//! Configuration validation errors

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("invalid proxy kind {0:?}, only http and https are supported")]
    InvalidKind(String),

    #[error("invalid proxy address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: &'static str },

    #[error("invalid local address {0:?}")]
    InvalidLocalAddress(String),

    #[error("proxy tunneling cannot bind local address {0}")]
    LocalBindUnsupported(std::net::SocketAddr),

    #[error("invalid root certificate: {0}")]
    InvalidCertificate(String),

    #[error("direct dialer has no upstream proxy")]
    NoUpstream,

    #[error("invalid configuration document: {0}")]
    Document(#[from] serde_json::Error),
}
