//! Security headers middleware.
//!
//! Adds security-related HTTP headers to all responses.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Header names set by [`security_headers_middleware`].
pub mod headers {
    pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
    pub const X_FRAME_OPTIONS: &str = "x-frame-options";
    pub const REFERRER_POLICY: &str = "referrer-policy";
}

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Adds the standard security headers to every response.
///
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Strict-Transport-Security`, except for requests addressed to a
///   loopback host (local development over plain HTTP)
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let local = is_local_request(req.headers());
    let mut response = next.run(req).await;
    let out = response.headers_mut();

    out.insert(
        header::HeaderName::from_static(headers::X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    out.insert(
        header::HeaderName::from_static(headers::X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    out.insert(
        header::HeaderName::from_static(headers::REFERRER_POLICY),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if !local {
        out.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        );
    }

    response
}

/// True when the `Host` header names a loopback address. Requests without a
/// host header count as local.
fn is_local_request(request_headers: &HeaderMap) -> bool {
    let Some(host) = request_headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
    else {
        return true;
    };

    let hostname = if let Some(rest) = host.strip_prefix('[') {
        rest.split(']').next().unwrap_or(rest)
    } else {
        host.split(':').next().unwrap_or(host)
    };

    matches!(hostname, "localhost" | "127.0.0.1" | "::1") || hostname.ends_with(".localhost")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    fn host(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::HOST, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_is_local_request() {
        assert!(is_local_request(&host("localhost:4000")));
        assert!(is_local_request(&host("127.0.0.1")));
        assert!(is_local_request(&host("[::1]:4000")));
        assert!(is_local_request(&host("admin.localhost")));
        assert!(is_local_request(&HeaderMap::new()));
        assert!(!is_local_request(&host("api.apeck.org")));
        assert!(!is_local_request(&host("10.0.0.5:4000")));
    }

    async fn response_for(host_header: &str) -> Response {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(security_headers_middleware));
        app.oneshot(
            Request::builder()
                .uri("/")
                .header(header::HOST, host_header)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_headers_on_public_host() {
        let response = response_for("cms.apeck.org").await;
        let got = response.headers();
        assert_eq!(got[headers::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(got[headers::X_FRAME_OPTIONS], "DENY");
        assert_eq!(got[headers::REFERRER_POLICY], "strict-origin-when-cross-origin");
        assert_eq!(got[header::STRICT_TRANSPORT_SECURITY], HSTS_VALUE);
    }

    #[tokio::test]
    async fn test_no_hsts_on_localhost() {
        let response = response_for("localhost:4000").await;
        assert!(response.headers().get(header::STRICT_TRANSPORT_SECURITY).is_none());
        assert_eq!(response.headers()[headers::X_FRAME_OPTIONS], "DENY");
    }
}
