//! Connection types and trait definitions
//!
//! - `connection`: the `Connection` trait every dialer returns
//! - `tcp_impl`: the raw TCP connection with deadline support

pub mod connection;
pub mod tcp_impl;

pub use connection::Connection;
pub use tcp_impl::TcpConnection;
