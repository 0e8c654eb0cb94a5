//! tunnelchain prelude
//!
//! The types most callers need to configure proxies and dial through them.

pub use crate::config::{BasicAuth, ConfigurationError, ProxyConfig, ProxyKind, ResolvedConfig};
pub use crate::connect::{Connection, DirectProxyClient, TcpConnection};
pub use crate::error::{Error, Kind, Result};
pub use crate::proxy::{HttpProxyClient, ProxyClient};
pub use crate::tunnel::TunnelConnection;
