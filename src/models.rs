//! Request and response models for the API.
//!
//! All models use serde for serialization/deserialization. JSON field names
//! follow the storefront's camelCase convention. Storage models represent
//! the Redis product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Request body for admin login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// The single statically configured privileged account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub email: String,
    pub role: Role,
}

// ============================================================================
// Product Models
// ============================================================================

/// Product as stored in Redis and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub description: String,
    pub short_description: String,
    pub created_at: u64,
}

/// Request body for product creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub description: String,
    pub short_description: String,
}

/// Request body for partial product update.
///
/// Every field is optional; `image` distinguishes "absent" (leave as-is)
/// from an explicit `null` (clear the image) via the nested `Option`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image: Option<Option<String>>,
    pub description: Option<String>,
    pub short_description: Option<String>,
}

impl UpdateProductRequest {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.description.is_none()
            && self.short_description.is_none()
    }
}

/// Deserialize a present-but-possibly-null field into `Some(inner)`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ============================================================================
// Roles
// ============================================================================

/// Role asserted by a session token. Only one exists in this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
