//! Pseudonymous identifiers for Measurement Protocol events

use sha2::{Digest, Sha256};
use std::net::IpAddr;

const CLIENT_ID_PREFIX: &str = "server-side.";

/// Stable per-client id: a SHA-256 of the client IP followed by the User-Agent.
pub fn client_id(client_ip: IpAddr, user_agent: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(client_ip.to_string().as_bytes());
    hasher.update(user_agent.as_bytes());
    format!("{CLIENT_ID_PREFIX}{:x}", hasher.finalize())
}

/// Unix time in whole seconds, used as a coarse session id.
///
/// Two requests in the same second share a session.
pub fn session_id() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0)";

    #[test]
    fn test_client_id_is_deterministic() {
        let ip: IpAddr = "203.0.113.7".parse().unwrap();
        assert_eq!(client_id(ip, UA), client_id(ip, UA));
    }

    #[test]
    fn test_client_id_format() {
        let ip: IpAddr = "203.0.113.7".parse().unwrap();
        let id = client_id(ip, UA);

        let digest = id.strip_prefix("server-side.").unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_client_id_matches_concatenated_digest() {
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let expected = format!("server-side.{:x}", Sha256::digest(b"10.0.0.1curl/8.4.0"));
        assert_eq!(client_id(ip, "curl/8.4.0"), expected);
    }

    #[test]
    fn test_client_id_differs_by_ip_or_agent() {
        let a: IpAddr = "203.0.113.7".parse().unwrap();
        let b: IpAddr = "203.0.113.8".parse().unwrap();

        assert_ne!(client_id(a, UA), client_id(b, UA));
        assert_ne!(client_id(a, UA), client_id(a, "curl/8.4.0"));
    }

    #[test]
    fn test_session_id_is_current_second() {
        let before = chrono::Utc::now().timestamp();
        let id = session_id();
        let after = chrono::Utc::now().timestamp();
        assert!(before <= id && id <= after);
    }
}
