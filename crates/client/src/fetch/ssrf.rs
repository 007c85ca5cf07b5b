//! SSRF (Server-Side Request Forgery) protection.
//!
//! Page URLs come from callers of the service, so before fetching, the
//! target host is resolved and every address is checked against private,
//! internal and reserved ranges.
use std::net::IpAddr;
use std::sync::LazyLock;

use ipnet::IpNet;
use url::{Host, Url};

/// Reserved ranges the std `is_*` predicates do not cover.
static RESERVED_NETS: LazyLock<Vec<IpNet>> = LazyLock::new(|| {
    [
        "100.64.0.0/10",   // carrier-grade NAT
        "192.0.0.0/24",    // IETF protocol assignments
        "192.0.2.0/24",    // TEST-NET-1
        "198.18.0.0/15",   // benchmarking
        "198.51.100.0/24", // TEST-NET-2
        "203.0.113.0/24",  // TEST-NET-3
        "240.0.0.0/4",     // reserved
        "2001:db8::/32",   // IPv6 documentation
    ]
    .iter()
    .filter_map(|net| net.parse().ok())
    .collect()
});

/// Error type for SSRF validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SsrfError {
    #[error("blocked IP: {0} (private/reserved)")]
    BlockedIp(IpAddr),

    #[error("DNS resolution failed: {0}")]
    DnsError(String),
}

impl From<SsrfError> for linkdiff_core::Error {
    fn from(err: SsrfError) -> Self {
        linkdiff_core::Error::FetchFailed(err.to_string())
    }
}

/// Check if an IP address is private, reserved, or otherwise blocked.
///
/// This covers:
/// - Loopback addresses (127.0.0.0/8, ::1)
/// - RFC 1918 private ranges (10/8, 172.16/12, 192.168/16)
/// - Link-local addresses (169.254/16, fe80::/10)
/// - Multicast and broadcast addresses
/// - Unspecified addresses (0.0.0.0/8, ::)
/// - IPv6 unique local (fc00::/7)
/// - Shared, documentation and benchmarking ranges
/// - IPv4-mapped IPv6 addresses are checked as their IPv4 form
pub fn is_private_or_reserved(ip: IpAddr) -> bool {
    let blocked = match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_multicast()
                || v4.is_broadcast()
                || v4.is_unspecified()
                || v4.octets()[0] == 0
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_private_or_reserved(IpAddr::V4(mapped));
            }
            v6.is_loopback()
                || v6.is_multicast()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    };

    blocked || RESERVED_NETS.iter().any(|net| net.contains(&ip))
}

/// Validate that an IP address is not private or reserved.
pub fn validate_ip(ip: IpAddr) -> Result<(), SsrfError> {
    if is_private_or_reserved(ip) { Err(SsrfError::BlockedIp(ip)) } else { Ok(()) }
}

/// Resolve the URL's host and validate every address it points to.
///
/// Literal IP hosts are checked without a DNS lookup.
pub async fn check_url(url: &Url) -> Result<(), SsrfError> {
    let port = url.port_or_known_default().unwrap_or(443);

    match url.host() {
        Some(Host::Ipv4(v4)) => validate_ip(IpAddr::V4(v4)),
        Some(Host::Ipv6(v6)) => validate_ip(IpAddr::V6(v6)),
        Some(Host::Domain(domain)) => {
            let addrs = tokio::net::lookup_host((domain, port))
                .await
                .map_err(|e| SsrfError::DnsError(format!("{domain}: {e}")))?;

            let mut resolved = 0usize;
            for addr in addrs {
                validate_ip(addr.ip())?;
                resolved += 1;
            }

            if resolved == 0 {
                return Err(SsrfError::DnsError(format!("{domain}: no addresses")));
            }
            Ok(())
        }
        None => Err(SsrfError::DnsError("URL has no host".into())),
    }
}
