use argon2::password_hash::PasswordHash;
use std::env;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct Config {
    // Admin identity
    pub admin_email: String,
    pub admin_password_hash: String,

    // Token signing
    pub jwt_secret: String,

    // Redis
    pub redis_url: String,

    // Server
    pub bind_addr: SocketAddr,

    // Session
    pub session_ttl_secs: u64,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("admin_email", &self.admin_email)
            .field("admin_password_hash", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Admin identity - both values are required
        let admin_email = require_nonempty("ADMIN_EMAIL")?;
        let admin_password_hash = require_nonempty("ADMIN_PASSWORD_HASH")?;

        // Validate the hash is a parseable PHC string (e.g. "$argon2id$...")
        // so a plaintext password pasted by mistake fails at startup, not
        // on the first login attempt.
        PasswordHash::new(&admin_password_hash).map_err(|e| {
            ConfigError::InvalidValue(
                "ADMIN_PASSWORD_HASH".to_string(),
                format!("not a valid password hash: {}", e),
            )
        })?;

        // Token signing secret - required
        let jwt_secret = require_nonempty("JWT_SECRET")?;

        // Redis — required to prevent silent unauthenticated connections
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // Session window (24h default, matches the cookie Max-Age)
        let session_ttl_secs = parse_env_or_default("SESSION_TTL_SECS", 86_400)?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let cookie_secure = parse_env_or_default("COOKIE_SECURE", false)?;

        Ok(Config {
            admin_email,
            admin_password_hash,
            jwt_secret,
            redis_url,
            bind_addr,
            session_ttl_secs,
            cookie_secure,
        })
    }
}

/// Read a required environment variable, rejecting empty values.
fn require_nonempty(key: &str) -> Result<String, ConfigError> {
    let value = env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "cannot be empty".to_string(),
        ));
    }
    Ok(value)
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
