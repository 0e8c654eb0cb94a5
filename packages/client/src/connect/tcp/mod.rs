//! TCP connection utilities
//!
//! DNS resolution, address-list dialing with an overall budget, and the
//! kernel socket options exposed on every connection.

pub mod basic_connection;
pub mod dns_resolution;
pub mod socket_config;

pub use basic_connection::connect_to_address_list;
pub use dns_resolution::resolve_host;
pub use socket_config::{set_linger, set_nodelay, set_read_buffer, set_write_buffer};
