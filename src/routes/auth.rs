//! Auth API endpoints: admin login and logout.
//!
//! Both endpoints own the cookie lifecycle: login attaches a fresh session
//! cookie to the response, logout overwrites it with an expired value. All
//! verifier/issuer errors are turned into HTTP responses here; none
//! propagate further.

use crate::auth::middleware::{expired_cookie, session_cookie, AppState};
use crate::auth::{issue, verify_credentials, AuthError};
use crate::error::AppError;
use crate::models::LoginRequest;
use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

/// POST /api/auth/login — Verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let identity =
        verify_credentials(&state.config, &req.email, &req.password).map_err(|err| match err {
            AuthError::MissingCredentials => {
                AppError::BadRequest("Email and password are required".to_string())
            }
            AuthError::InvalidCredentials => {
                // Single generic message regardless of which sub-check failed
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            other => AppError::Internal(format!("Credential verification failed: {}", other)),
        })?;

    let token = issue(&identity, &state.config)
        .map_err(|err| AppError::Internal(format!("Token issuance failed: {}", err)))?;

    tracing::info!(action = "login", email = %identity.email, "Admin logged in");

    let jar = jar.add(session_cookie(token, &state.config));
    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "email": identity.email,
                "role": identity.role.as_str(),
            }
        })),
    ))
}

/// POST /api/auth/logout (GET alias) — Clear the session cookie
///
/// Succeeds unconditionally: the token is client-held, so logging out is
/// just overwriting the cookie with an already-expired value.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    tracing::info!(action = "logout", "Session cookie cleared");

    let jar = jar.add(expired_cookie(&state.config));
    (
        jar,
        Json(json!({
            "success": true,
            "message": "Logout successful"
        })),
    )
}
