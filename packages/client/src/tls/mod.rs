//! TLS to HTTPS proxies
//!
//! Client configuration with the `ring` provider, certificate verifiers for
//! both verification modes, the blocking handshake, and the explicit
//! post-handshake hostname check.

pub mod errors;
pub mod hostname;
pub mod tls_manager;
mod verifier;

pub use errors::TlsError;
pub use hostname::{verify_certificate_hostname, verify_peer_hostname};
pub use tls_manager::{TlsManager, TlsStream};
