//! tunnelchain public API
//!
//! Dial TCP destinations through one or more HTTP/HTTPS proxies. A fluent
//! [`Tunnel`] builder configures a single hop; [`chain`] nests several.

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;
pub mod chain;

pub use builder::*;
pub use chain::{chain, chain_from_json, describe_chain};

pub use tunnelchain_client::{
    BasicAuth, Connection, DirectProxyClient, Error, HttpProxyClient, Kind, ProxyClient,
    ProxyConfig, ProxyKind, Result, TunnelConnection,
};
