//! Credential verification against the configured admin identity.

use crate::auth::AuthError;
use crate::config::Config;
use crate::models::{AdminIdentity, Role};
use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};

/// Verify a submitted email/password pair against the configured admin.
///
/// The email comparison is a case-sensitive exact match; the password is
/// verified against the stored argon2 PHC hash (constant-time inside the
/// verifier). Both an unknown email and a wrong password yield the same
/// `InvalidCredentials` so the response shape cannot distinguish them.
///
/// Stateless: no side effects, safe to call concurrently.
pub fn verify_credentials(
    config: &Config,
    email: &str,
    password: &str,
) -> Result<AdminIdentity, AuthError> {
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    // Config::from_env already requires these, but the verifier must never
    // compare against empty values if construction was bypassed. The error
    // does not say which value is missing.
    if config.admin_email.is_empty()
        || config.admin_password_hash.is_empty()
        || config.jwt_secret.is_empty()
    {
        return Err(AuthError::ServerMisconfigured);
    }

    if email != config.admin_email {
        return Err(AuthError::InvalidCredentials);
    }

    let parsed_hash = PasswordHash::new(&config.admin_password_hash)
        .map_err(|_| AuthError::ServerMisconfigured)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)?;

    Ok(AdminIdentity {
        email: config.admin_email.clone(),
        role: Role::Admin,
    })
}

/// Hash a password into an argon2 PHC string suitable for
/// `ADMIN_PASSWORD_HASH`. Used by the `hash-password` subcommand and tests.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| AuthError::ServerMisconfigured)
}
