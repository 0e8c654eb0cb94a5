//! Proxy configuration
//!
//! Serializable proxy settings plus the validated, normalized form the
//! HTTP proxy client is built from.

pub mod kind;
pub mod proxy;
pub mod validation;

pub use kind::ProxyKind;
pub use proxy::{BasicAuth, ProxyConfig, ResolvedConfig};
pub use validation::{ConfigResult, ConfigurationError};
