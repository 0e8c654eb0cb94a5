//! Terminal dial methods

use std::time::Duration;

use tunnelchain_client::{Connection, ProxyClient, Result};

use crate::builder::core::Tunnel;

impl Tunnel {
    /// Build the client and open a tunnel to `target` (`host:port`).
    ///
    /// Uses the configured connect timeout, if any.
    ///
    /// # Errors
    ///
    /// Configuration errors from [`Tunnel::build`], or any dial failure.
    pub fn dial(self, target: &str) -> Result<Box<dyn Connection>> {
        self.build()?.dial("tcp", target)
    }

    /// Build the client and open a tunnel within `timeout`.
    ///
    /// # Errors
    ///
    /// Configuration errors from [`Tunnel::build`], or any dial failure.
    pub fn dial_timeout(self, target: &str, timeout: Duration) -> Result<Box<dyn Connection>> {
        self.build()?.dial_timeout("tcp", target, timeout)
    }
}
