//! Session token issuance and validation (HS256 JWT).
//!
//! Tokens are self-contained bearer credentials: the claims plus signature
//! are the entire session state. There is no server-side session table, so
//! validation costs one signature check and a timestamp comparison per
//! request.

use crate::auth::AuthError;
use crate::config::Config;
use crate::models::{AdminIdentity, Role};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub role: Role,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Issue a signed session token for the admin identity.
///
/// The validity window is fixed at `session_ttl_secs` (24h by default) and
/// is not configurable per call. Fails only if the signing secret is
/// unusable, which configuration validation should have caught earlier.
pub fn issue(identity: &AdminIdentity, config: &Config) -> Result<String, AuthError> {
    if config.jwt_secret.is_empty() {
        return Err(AuthError::SigningFailed);
    }

    let now = Utc::now().timestamp();
    let claims = Claims {
        email: identity.email.clone(),
        role: identity.role,
        iat: now,
        exp: now + config.session_ttl_secs as i64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|_| AuthError::SigningFailed)
}

/// Validate a token string and extract its claims.
///
/// A token is accepted iff its signature verifies against the signing
/// secret AND the current time is before its expiry. Either failing check
/// rejects the token; no other state participates.
pub fn validate(token: &str, config: &Config) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // No clock leeway: a token is invalid the second its window closes.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(ttl_secs: u64) -> Config {
        Config {
            admin_email: "admin@site.com".to_string(),
            admin_password_hash: String::new(),
            jwt_secret: "test-secret".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            session_ttl_secs: ttl_secs,
            cookie_secure: false,
        }
    }

    fn admin() -> AdminIdentity {
        AdminIdentity {
            email: "admin@site.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_issue_then_validate_round_trip() {
        let config = test_config(86_400);

        let token = issue(&admin(), &config).unwrap();
        let claims = validate(&token, &config).unwrap();

        assert_eq!(claims.email, "admin@site.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, claims.iat + 86_400);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config(86_400);

        // Encode claims whose window closed an hour ago.
        let now = Utc::now().timestamp();
        let claims = Claims {
            email: "admin@site.com".to_string(),
            role: Role::Admin,
            iat: now - 90_000,
            exp: now - 3_600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(validate(&token, &config).unwrap_err(), AuthError::Expired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config(86_400);
        let token = issue(&admin(), &config).unwrap();

        let mut other = test_config(86_400);
        other.jwt_secret = "different-secret".to_string();

        assert_eq!(
            validate(&token, &other).unwrap_err(),
            AuthError::InvalidSignature
        );
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let config = test_config(86_400);
        let token = issue(&admin(), &config).unwrap();

        // Flip the first character of the signature segment (the leading
        // six bits of the MAC, so the decoded bytes always change).
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let sig = &parts[2];
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        parts[2] = format!("{}{}", flipped, &sig[1..]);
        let tampered = parts.join(".");

        let err = validate(&tampered, &config).unwrap_err();
        assert!(
            err == AuthError::InvalidSignature || err == AuthError::MalformedToken,
            "tampered token must never validate, got {:?}",
            err
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        let config = test_config(86_400);
        let token = issue(&admin(), &config).unwrap();

        // Re-encode the payload with a different email, keeping the
        // original signature. Must fail signature verification.
        let parts: Vec<&str> = token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let mut claims: Claims = serde_json::from_slice(&payload).unwrap();
        claims.email = "attacker@site.com".to_string();
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        let err = validate(&forged, &config).unwrap_err();
        assert!(
            err == AuthError::InvalidSignature || err == AuthError::MalformedToken,
            "forged claims must never validate, got {:?}",
            err
        );
    }

    #[test]
    fn test_garbage_token_malformed() {
        let config = test_config(86_400);

        assert_eq!(
            validate("not-a-jwt", &config).unwrap_err(),
            AuthError::MalformedToken
        );
        assert_eq!(
            validate("", &config).unwrap_err(),
            AuthError::MalformedToken
        );
    }

    #[test]
    fn test_empty_secret_fails_signing() {
        let mut config = test_config(86_400);
        config.jwt_secret = String::new();

        assert_eq!(issue(&admin(), &config).unwrap_err(), AuthError::SigningFailed);
    }
}
