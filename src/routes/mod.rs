//! API route handlers.

pub mod auth;
pub mod products;

use crate::auth::middleware::AppState;
use crate::error::AppError;
use axum::{routing::get, routing::post, Router};
use tower_http::services::ServeFile;

/// Maximum accepted product name length.
const MAX_NAME_LEN: usize = 128;

/// Validate a product name (used both as a JSON field and a path segment).
///
/// Names are free-form ("Blue Hoodie") but must be non-empty, bounded, and
/// free of control characters.
pub fn validate_product_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Product name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(AppError::BadRequest(
            "Product name contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth endpoints
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout).get(auth::logout))
        // Product endpoints
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{name}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
}

/// Build the router for browser-navigated pages.
///
/// Explicit ServeFile routes rather than directory serving: `/admin/login`
/// must answer directly (a trailing-slash redirect here would interfere
/// with the gate's no-loop exception). The product detail page serves the
/// same shell for every name; the script on it resolves the record.
pub fn page_router() -> Router<AppState> {
    Router::new()
        .route_service("/admin/login", ServeFile::new("static/admin/login.html"))
        .route_service(
            "/admin/products",
            ServeFile::new("static/admin/products.html"),
        )
        .route_service("/products/{name}", ServeFile::new("static/product.html"))
}
