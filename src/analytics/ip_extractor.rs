//! Client IP extraction from HTTP headers
//!
//! The service is expected to sit behind a reverse proxy, so the first entry
//! of `X-Forwarded-For` is trusted as the originating client. Without that
//! header (or when its first entry is not an IP address) the socket remote
//! address is used. Proxies that append the client port (`203.0.113.5:1234`,
//! `[2001:db8::1]:443`) are accepted; the port is dropped.

use axum::http::HeaderMap;
use std::net::IpAddr;
use tracing::debug;

/// Extract the client IP address from HTTP headers
///
/// # Arguments
/// * `headers` - HTTP request headers
/// * `socket_addr` - The socket remote address (fallback)
pub fn extract_client_ip(headers: &HeaderMap, socket_addr: IpAddr) -> IpAddr {
    extract_from_x_forwarded_for(headers).unwrap_or(socket_addr)
}

/// Leftmost X-Forwarded-For entry, i.e. the client as seen by the first proxy
fn extract_from_x_forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let xff = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = xff.split(',').next()?.trim();

    match strip_port(first).parse::<IpAddr>() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!(x_forwarded_for = %xff, "ignoring unparseable X-Forwarded-For entry");
            None
        }
    }
}

/// Host part of `ip`, `ip:port`, `[ipv6]` or `[ipv6]:port`. A bare IPv6
/// address has more than one colon and is returned unchanged.
fn strip_port(entry: &str) -> &str {
    if let Some(bracketed) = entry.strip_prefix('[') {
        return bracketed.split_once(']').map_or(entry, |(host, _)| host);
    }

    match entry.split_once(':') {
        Some((host, port)) if !port.contains(':') => host,
        _ => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn socket() -> IpAddr {
        "192.168.1.1".parse().unwrap()
    }

    #[test]
    fn test_no_header_uses_socket() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers, socket()), socket());
    }

    #[test]
    fn test_x_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.1, 198.51.100.1"),
        );

        let result = extract_client_ip(&headers, socket());
        assert_eq!(result, "203.0.113.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_x_forwarded_for_single_ipv6() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" 2001:db8::1 "));

        let result = extract_client_ip(&headers, socket());
        assert_eq!(result, "2001:db8::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_garbage_header_uses_socket() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("unknown, 198.51.100.1"),
        );

        assert_eq!(extract_client_ip(&headers, socket()), socket());
    }

    #[test]
    fn test_x_forwarded_for_ipv4_with_port() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.5:1234, 198.51.100.1"),
        );

        let result = extract_client_ip(&headers, socket());
        assert_eq!(result, "203.0.113.5".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_x_forwarded_for_bracketed_ipv6() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("[2001:db8::1]:443"));
        assert_eq!(
            extract_client_ip(&headers, socket()),
            "2001:db8::1".parse::<IpAddr>().unwrap()
        );

        headers.insert("x-forwarded-for", HeaderValue::from_static("[2001:db8::2]"));
        assert_eq!(
            extract_client_ip(&headers, socket()),
            "2001:db8::2".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_strip_port_keeps_bare_ipv6() {
        assert_eq!(strip_port("::1"), "::1");
        assert_eq!(strip_port("2001:db8::1"), "2001:db8::1");
        assert_eq!(strip_port("203.0.113.5"), "203.0.113.5");
        assert_eq!(strip_port("203.0.113.5:80"), "203.0.113.5");
    }
}
