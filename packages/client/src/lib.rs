//! # tunnelchain client
//!
//! Blocking TCP dialers that reach their destination through one or more
//! HTTP or HTTPS forward proxies using `CONNECT`.
//!
//! ## Features
//!
//! - **Chainable dialers**: every proxy client can use any other
//!   [`ProxyClient`] as its upstream, so proxies nest to arbitrary depth
//! - **HTTPS proxies** over rustls with certificate and hostname checks
//! - **Dial budgets** enforced across the whole establishment sequence
//! - **No lost bytes**: data sent by the proxy right after its response is
//!   replayed to the caller before the tunnel is read further
//!
//! ## Usage
//!
//! ```no_run
//! use std::io::{Read, Write};
//! use std::time::Duration;
//! use tunnelchain_client::{HttpProxyClient, ProxyClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let proxy = HttpProxyClient::new("http", "127.0.0.1:3128", "", false, None)?;
//! let mut conn = proxy.dial_timeout("tcp", "example.com:80", Duration::from_secs(5))?;
//! conn.write_all(b"GET / HTTP/1.0\r\nHost: example.com\r\n\r\n")?;
//! let mut reply = Vec::new();
//! conn.read_to_end(&mut reply)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod connect;
pub mod error;
pub mod proxy;
pub mod tls;
pub mod tunnel;

pub mod prelude;

pub use crate::prelude::*;
