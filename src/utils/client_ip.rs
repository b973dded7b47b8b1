//! Client address extraction from HTTP request headers.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Determines the originating client IP of a request.
///
/// Priority:
/// 1. First hop of `X-Forwarded-For`, if it parses as an IP
/// 2. `X-Real-IP`, if it parses as an IP
/// 3. The transport-level peer address
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = client_ip(&headers, "127.0.0.1:4000".parse().unwrap());
/// assert_eq!(ip.to_string(), "203.0.113.7");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    if let Some(ip) = forwarded {
        return ip;
    }

    headers
        .get(X_REAL_IP)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
        .unwrap_or_else(|| peer.ip())
}

/// Returns true for addresses that never resolve to a public location.
///
/// Covers loopback, private (RFC 1918), link-local, IPv6 unique-local and
/// unspecified addresses. IPv4-mapped IPv6 addresses are checked as IPv4.
pub fn is_local_ip(ip: IpAddr) -> bool {
    match ip.to_canonical() {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unicast_link_local()
                || v6.is_unique_local()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "198.51.100.20:5555".parse().unwrap()
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer()).to_string(), "198.51.100.20");
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1, 10.0.0.2"),
        );
        headers.insert(X_REAL_IP, HeaderValue::from_static("192.0.2.1"));

        assert_eq!(client_ip(&headers, peer()).to_string(), "203.0.113.7");
    }

    #[test]
    fn test_invalid_forwarded_for_uses_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("unknown, 10.0.0.1"));
        headers.insert(X_REAL_IP, HeaderValue::from_static("192.0.2.1"));

        assert_eq!(client_ip(&headers, peer()).to_string(), "192.0.2.1");
    }

    #[test]
    fn test_invalid_headers_use_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("garbage"));
        headers.insert(X_REAL_IP, HeaderValue::from_static("also-garbage"));

        assert_eq!(client_ip(&headers, peer()).to_string(), "198.51.100.20");
    }

    #[test]
    fn test_ipv6_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("2001:db8::1"));

        assert_eq!(client_ip(&headers, peer()).to_string(), "2001:db8::1");
    }

    #[test]
    fn test_local_ipv4_ranges() {
        for ip in ["127.0.0.1", "10.1.2.3", "172.16.0.9", "192.168.1.1", "169.254.3.4", "0.0.0.0"] {
            assert!(is_local_ip(ip.parse().unwrap()), "{ip} should be local");
        }
    }

    #[test]
    fn test_local_ipv6_ranges() {
        for ip in ["::1", "fe80::1", "fd12:3456::1", "::", "::ffff:192.168.0.1"] {
            assert!(is_local_ip(ip.parse().unwrap()), "{ip} should be local");
        }
    }

    #[test]
    fn test_public_addresses() {
        for ip in ["8.8.8.8", "203.0.113.7", "2606:4700:4700::1111", "::ffff:8.8.8.8"] {
            assert!(!is_local_ip(ip.parse().unwrap()), "{ip} should be public");
        }
    }
}
