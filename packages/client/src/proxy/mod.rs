//! Proxy clients
//!
//! The `ProxyClient` trait shared by every dialer in the crate and the
//! HTTP/HTTPS CONNECT proxy client built on it.

pub mod http_client;
pub mod types;

pub use http_client::HttpProxyClient;
pub use types::ProxyClient;
