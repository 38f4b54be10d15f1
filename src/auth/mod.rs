//! Authentication layer: credential verification, signed session tokens,
//! and the request gate protecting admin pages.

pub mod middleware;
pub mod token;
pub mod verify;

pub use middleware::{AdminClaims, AppState};
pub use token::{issue, validate, Claims};
pub use verify::verify_credentials;

/// Authentication failure taxonomy.
///
/// Every variant has a defined user-visible outcome at the handler boundary;
/// none propagates as an unhandled fault. `InvalidCredentials` deliberately
/// covers both unknown email and wrong password so responses cannot be used
/// to enumerate accounts.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Server configuration error")]
    ServerMisconfigured,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token signing failed")]
    SigningFailed,
}
