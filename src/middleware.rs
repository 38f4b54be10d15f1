//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Middleware that adds baseline security headers to all responses.
///
/// - **X-Content-Type-Options: nosniff** — forces browsers to respect
///   declared Content-Type headers.
/// - **X-Frame-Options: DENY** — the storefront and admin panel never need
///   to be embedded in frames.
/// - **Referrer-Policy: strict-origin-when-cross-origin** — external
///   navigation only sees the origin.
/// - **Strict-Transport-Security** — forces HTTPS for 2 years including
///   subdomains.
/// - **Content Security Policy** — same-origin scripts and styles; images
///   may come from https CDNs since product images are externally hosted.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self'; \
             img-src 'self' data: https:; \
             object-src 'none'; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    response
}
