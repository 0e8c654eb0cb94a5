//! Proxy kind token parsing

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::validation::ConfigurationError;

/// Transport used to reach the proxy itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKind {
    /// Plain TCP to the proxy
    Http,
    /// TLS-wrapped TCP to the proxy
    Https,
}

impl ProxyKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyKind::Http => "http",
            ProxyKind::Https => "https",
        }
    }

    #[must_use]
    pub fn is_tls(self) -> bool {
        matches!(self, ProxyKind::Https)
    }
}

impl FromStr for ProxyKind {
    type Err = ConfigurationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let normalized = token
            .trim_matches(|c| matches!(c, ' ' | '\r' | '\n' | '\t'))
            .to_ascii_lowercase();
        match normalized.as_str() {
            "http" => Ok(ProxyKind::Http),
            "https" => Ok(ProxyKind::Https),
            _ => Err(ConfigurationError::InvalidKind(token.to_string())),
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProxyKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProxyKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}
