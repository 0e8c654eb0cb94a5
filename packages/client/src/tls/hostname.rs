//! Post-handshake hostname verification
//!
//! Matches the verification domain against the DNS and IP subject
//! alternative names of the leaf certificate. The common name is ignored.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use rustls::ClientConnection;
use x509_parser::extensions::GeneralName;

use super::errors::TlsError;

/// Check the proxy's leaf certificate against `domain`.
pub fn verify_peer_hostname(conn: &ClientConnection, domain: &str) -> Result<(), TlsError> {
    let leaf = conn
        .peer_certificates()
        .and_then(|certs| certs.first())
        .ok_or(TlsError::NoPeerCertificate)?;
    verify_certificate_hostname(leaf.as_ref(), domain)
}

/// Check a DER certificate against `domain`.
pub fn verify_certificate_hostname(der: &[u8], domain: &str) -> Result<(), TlsError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| TlsError::CertificateParsing(e.to_string()))?;
    let san = cert
        .subject_alternative_name()
        .map_err(|e| TlsError::CertificateParsing(e.to_string()))?;

    let wanted_ip = domain
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .ok();

    let mut presented = Vec::new();
    if let Some(san) = san {
        for name in &san.value.general_names {
            match name {
                GeneralName::DNSName(dns) => {
                    if wanted_ip.is_none() && matches_dns_name(dns, domain) {
                        return Ok(());
                    }
                    presented.push((*dns).to_string());
                }
                GeneralName::IPAddress(bytes) => {
                    if let Some(ip) = ip_from_san(bytes) {
                        if wanted_ip == Some(ip) {
                            return Ok(());
                        }
                        presented.push(ip.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    Err(TlsError::HostnameMismatch {
        domain: domain.to_string(),
        presented,
    })
}

fn ip_from_san(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

/// Case-insensitive match; `*` is only honoured as the whole leftmost label.
fn matches_dns_name(pattern: &str, host: &str) -> bool {
    let pattern = pattern.trim_end_matches('.').to_ascii_lowercase();
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    if pattern.is_empty() || host.is_empty() {
        return false;
    }
    if pattern == host {
        return true;
    }

    match (pattern.strip_prefix("*."), host.split_once('.')) {
        (Some(suffix), Some((first, rest))) => !first.is_empty() && rest == suffix,
        _ => false,
    }
}
