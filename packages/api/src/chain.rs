//! Proxy chains
//!
//! A chain is a list of proxies where each hop is dialled through the one
//! before it. The first entry is reached directly.

use std::sync::Arc;

use tunnelchain_client::error;
use tunnelchain_client::{
    ConfigurationError, DirectProxyClient, HttpProxyClient, ProxyClient, ProxyConfig, Result,
};

/// Build the chain described by `configs`, returning its outermost client.
///
/// An empty list yields a direct dialer.
///
/// # Errors
///
/// Returns the configuration error of the first invalid entry.
pub fn chain(configs: &[ProxyConfig]) -> Result<Arc<dyn ProxyClient>> {
    let mut current: Arc<dyn ProxyClient> = Arc::new(DirectProxyClient::default());
    for (hop, config) in configs.iter().enumerate() {
        let client = HttpProxyClient::from_config(config, Some(current))?;
        tracing::trace!(hop, proxy = %client.describe(), "chain hop added");
        current = Arc::new(client);
    }
    Ok(current)
}

/// Build a chain from a JSON array of proxy configurations.
///
/// # Errors
///
/// Returns a configuration error if the document is not an array of
/// proxies or any entry is invalid.
pub fn chain_from_json(json: &str) -> Result<Arc<dyn ProxyClient>> {
    let configs: Vec<ProxyConfig> = serde_json::from_str(json)
        .map_err(|e| error::config(ConfigurationError::Document(e)))?;
    chain(&configs)
}

/// Labels of every hop from `client` inward, ending with the direct dialer.
#[must_use]
pub fn describe_chain(client: &dyn ProxyClient) -> Vec<String> {
    let mut labels = vec![client.describe()];
    let mut next = client.up_proxy();
    while let Some(hop) = next {
        labels.push(hop.describe());
        next = hop.up_proxy();
    }
    labels
}
