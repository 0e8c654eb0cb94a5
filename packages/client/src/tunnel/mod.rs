//! CONNECT tunnels
//!
//! Everything between "an upstream connection to the proxy exists" and
//! "the caller holds a stream to the destination": the request codec, the
//! buffered response read, the leftover-aware reader, the active transport,
//! the establishment sequence and the deadline race around it.

pub mod connection;
pub(crate) mod deadline;
pub(crate) mod establish;
pub mod prefixed;
pub mod request;
pub mod response;
pub mod transport;

pub use connection::TunnelConnection;
pub use prefixed::Prefixed;
pub use request::{build_connect_request, encode_connect_request};
pub use response::read_response;
pub use transport::Transport;
