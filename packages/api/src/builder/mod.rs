//! Tunnel builder API modules
//!
//! Fluent configuration of a single HTTP or HTTPS proxy hop, ending in
//! either a reusable client or a dialled connection.

pub mod auth;
pub mod core;
pub mod methods;

pub use core::*;
