//! Session gate middleware and authenticated-request extractors.
//!
//! The gate runs ahead of every route. For paths under a protected prefix
//! it reads the session cookie, validates the token, and either forwards
//! the request (claims attached to request extensions) or redirects the
//! browser to the login page. JSON API handlers use the [`AdminClaims`]
//! extractor instead, which rejects with a 401 body rather than a redirect.

use crate::auth::{token, AuthError};
use crate::config::Config;
use crate::error::AppError;
use crate::models::Role;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Name of the session cookie carried by the browser.
pub const AUTH_COOKIE: &str = "auth-token";

/// Login page, exempt from gating to avoid a redirect loop.
pub const LOGIN_PATH: &str = "/admin/login";

/// Path prefixes that require a valid session. Prefix matching covers
/// nested paths (`/admin/products/123`, `/admin/products/edit/456`, ...).
const PROTECTED_PREFIXES: &[&str] = &[
    "/admin/dashboard",
    "/admin/products",
    "/admin/users",
    "/admin/orders",
    "/admin/settings",
    "/admin/categories",
    "/admin/inventory",
];

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub config: Arc<Config>,
}

/// Build the session cookie wrapping a freshly issued token.
pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(config.session_ttl_secs as i64))
        .build()
}

/// Build an already-expired, empty cookie that overwrites the session
/// cookie in the browser.
pub fn expired_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// Gate requests to protected admin pages.
///
/// Unprotected paths and the login page pass through unchanged. Protected
/// paths without a cookie redirect to the login page; any validation
/// failure also overwrites the stale cookie with an expired value. The
/// check runs on every gated request; the token is self-contained so no
/// store lookup is needed.
pub async fn session_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if path == LOGIN_PATH {
        return next.run(request).await;
    }

    if !PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return next.run(request).await;
    }

    let Some(cookie) = jar.get(AUTH_COOKIE) else {
        tracing::debug!(path = %path, "No session cookie, redirecting to login");
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match token::validate(cookie.value(), &state.config) {
        Ok(claims) => {
            let mut request = request;
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(path = %path, error = %err, "Session token rejected, clearing cookie");
            let jar = CookieJar::new().add(expired_cookie(&state.config));
            (jar, Redirect::to(LOGIN_PATH)).into_response()
        }
    }
}

/// Validated admin claims for JSON API endpoints.
///
/// Reads the same session cookie the gate does, but rejects with a 401
/// JSON body instead of a redirect (these endpoints are fetched, not
/// browser-navigated).
pub struct AdminClaims(pub token::Claims);

impl FromRequestParts<AppState> for AdminClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let cookie = jar
            .get(AUTH_COOKIE)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let claims = token::validate(cookie.value(), &state.config).map_err(|err| match err {
            AuthError::Expired => AppError::Unauthorized("Session expired".to_string()),
            _ => AppError::Unauthorized("Invalid session".to_string()),
        })?;

        if claims.role != Role::Admin {
            return Err(AppError::Unauthorized("Admin access required".to_string()));
        }

        Ok(AdminClaims(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issue;
    use crate::models::AdminIdentity;
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let config = Config {
            admin_email: "admin@site.com".to_string(),
            admin_password_hash: String::new(),
            jwt_secret: "test-secret".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            session_ttl_secs: 86_400,
            cookie_secure: false,
        };
        AppState {
            // Client::open does not connect; the gate never touches Redis.
            redis: redis::Client::open("redis://127.0.0.1:6379").unwrap(),
            config: Arc::new(config),
        }
    }

    fn test_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/admin/login", get(|| async { "login page" }))
            .route("/admin/products", get(|| async { "products admin" }))
            .route("/admin/products/{id}", get(|| async { "product edit" }))
            .layer(middleware::from_fn_with_state(state.clone(), session_gate))
            .with_state(state)
    }

    fn valid_token(state: &AppState) -> String {
        let identity = AdminIdentity {
            email: "admin@site.com".to_string(),
            role: Role::Admin,
        };
        issue(&identity, &state.config).unwrap()
    }

    async fn send(router: Router, path: &str, cookie: Option<&str>) -> axum::response::Response {
        let mut builder = HttpRequest::builder().uri(path);
        if let Some(value) = cookie {
            builder = builder.header(header::COOKIE, format!("{}={}", AUTH_COOKIE, value));
        }
        router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unprotected_path_passes() {
        let state = test_state();
        let response = send(test_router(state), "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_page_never_redirected() {
        let state = test_state();
        let response = send(test_router(state), "/admin/login", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_path_without_cookie_redirects() {
        let state = test_state();
        let response = send(test_router(state), "/admin/products", None).await;

        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            LOGIN_PATH
        );
        // Missing cookie: nothing to clear.
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_protected_path_with_valid_cookie_allowed() {
        let state = test_state();
        let token = valid_token(&state);
        let response = send(test_router(state), "/admin/products", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_nested_protected_path_gated() {
        let state = test_state();
        let response = send(test_router(state), "/admin/products/123", None).await;
        assert!(response.status().is_redirection());
    }

    #[tokio::test]
    async fn test_tampered_cookie_redirects_and_clears() {
        let state = test_state();
        let token = valid_token(&state);
        let tampered = format!("{}x", token);

        let response = send(test_router(state), "/admin/products", Some(&tampered)).await;

        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            LOGIN_PATH
        );

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("bad cookie must be overwritten")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with(&format!("{}=", AUTH_COOKIE)));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_admin_claims_extractor_rejects_missing_cookie() {
        let state = test_state();
        let app = Router::new()
            .route(
                "/api/protected",
                get(|AdminClaims(claims): AdminClaims| async move { claims.email }),
            )
            .with_state(state);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/api/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_claims_extractor_accepts_valid_cookie() {
        let state = test_state();
        let token = valid_token(&state);
        let app = Router::new()
            .route(
                "/api/protected",
                get(|AdminClaims(claims): AdminClaims| async move { claims.email }),
            )
            .with_state(state);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/api/protected")
                    .header(header::COOKIE, format!("{}={}", AUTH_COOKIE, token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_session_cookie_flags() {
        let state = test_state();
        let cookie = session_cookie("tok".to_string(), &state.config);

        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
    }

    #[test]
    fn test_expired_cookie_is_empty_and_past() {
        let state = test_state();
        let cookie = expired_cookie(&state.config);

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
