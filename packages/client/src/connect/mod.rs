//! Stream connections and the direct dialer
//!
//! The `Connection` trait is the uniform stream interface every dialer in
//! this crate returns, whether the bytes travel over a plain socket or
//! through one or more proxy tunnels.

pub mod addr;
pub mod direct;
pub mod tcp;
pub mod types;

pub use addr::{Family, split_host_port};
pub use direct::DirectProxyClient;
pub use tcp::{
    connect_to_address_list, resolve_host, set_linger, set_nodelay, set_read_buffer,
    set_write_buffer,
};
pub use types::{Connection, TcpConnection};
