//! Proxy authentication

use tunnelchain_client::BasicAuth;

use crate::builder::core::Tunnel;

impl Tunnel {
    /// Send `Proxy-Authorization: Basic ...` with every CONNECT request.
    ///
    /// # Examples
    /// ```no_run
    /// use tunnelchain::Tunnel;
    ///
    /// let client = Tunnel::http("proxy.example.com:3128")
    ///     .basic_auth("alice", "s3cret")
    ///     .build();
    /// ```
    #[must_use]
    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        self.config.basic_auth = Some(BasicAuth::new(username, password));
        self
    }
}
