//! Client address and user agent, as recorded on sessions and reset codes.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

/// Longest user agent stored with a session.
const MAX_USER_AGENT_LEN: usize = 512;

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, else `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get(REAL_IP).and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Request metadata stored alongside sessions and password reset codes.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ip = Some(client_ip(headers)).filter(|ip| ip != "unknown");
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect::<String>())
            .filter(|ua| !ua.is_empty());
        Self { ip, user_agent }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_hop() {
        let map = headers(&[
            ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
        ]);
        assert_eq!(client_ip(&map), "203.0.113.7");
    }

    #[test]
    fn test_client_ip_falls_back() {
        assert_eq!(client_ip(&headers(&[("x-real-ip", "10.0.0.2")])), "10.0.0.2");
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_client_info_from_headers() {
        let info = ClientInfo::from_headers(&headers(&[
            ("x-forwarded-for", "198.51.100.1"),
            ("user-agent", "Mozilla/5.0"),
        ]));
        assert_eq!(info.ip.as_deref(), Some("198.51.100.1"));
        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0"));

        let empty = ClientInfo::from_headers(&HeaderMap::new());
        assert!(empty.ip.is_none());
        assert!(empty.user_agent.is_none());
    }
}
