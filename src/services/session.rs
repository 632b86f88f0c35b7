//! Per-session user identity.
//!
//! Clients carry their identifier in the `x-session-id` header; handlers echo
//! it back in both the payload and the response header so a fresh client can
//! bind the generated id for the rest of its session. Ids are 8 hex chars
//! derived from the current time: not globally unique by construction, but
//! collisions are negligible at this deployment's session counts.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;

/// Header carrying the session's user identifier
pub const SESSION_HEADER: &str = "x-session-id";

/// Returns the session's user id, generating and implicitly binding a new
/// one when the session carries none
pub fn user_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(fresh_id)
}

/// 8-character hex digest of the current time
pub fn fresh_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let digest = md5::compute(nanos.to_string().as_bytes());
    format!("{digest:x}")[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_fresh_id_is_8_hex_chars() {
        let id = fresh_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_existing_session_id_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("cafe1234"));
        assert_eq!(user_id(&headers), "cafe1234");
    }

    #[test]
    fn test_missing_or_empty_header_generates_id() {
        let headers = HeaderMap::new();
        let id = user_id(&headers);
        assert_eq!(id.len(), 8);

        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static(""));
        assert_eq!(user_id(&headers).len(), 8);
    }
}
