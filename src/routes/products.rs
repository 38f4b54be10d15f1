//! Product CRUD endpoints.
//!
//! Reads are public (the storefront fetches them without a session);
//! mutations require a valid admin session cookie via [`AdminClaims`].
//! Every response uses the `{ success, data | error }` envelope.

use crate::auth::middleware::{AdminClaims, AppState};
use crate::error::AppError;
use crate::models::{CreateProductRequest, Product, UpdateProductRequest};
use crate::routes::validate_product_name;
use crate::storage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

async fn connect(state: &AppState) -> Result<redis::aio::MultiplexedConnection, AppError> {
    state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price.is_sign_negative() {
        return Err(AppError::BadRequest(
            "Price must be a valid positive number".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/products — List all products, newest first
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut con = connect(&state).await?;
    let products = storage::product::list_products(&mut con).await?;

    Ok(Json(json!({
        "success": true,
        "data": products
    })))
}

/// GET /api/products/:name — Fetch a single product by name
pub async fn get_product(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_product_name(&name)?;

    let mut con = connect(&state).await?;
    let product = storage::product::get_product(&mut con, &name)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": product
    })))
}

/// POST /api/products — Create a new product (admin only)
pub async fn create_product(
    AdminClaims(_claims): AdminClaims,
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_product_name(&req.name)?;
    validate_price(req.price)?;
    if req.description.is_empty() || req.short_description.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required fields: name, price, description, shortDescription".to_string(),
        ));
    }

    let product = Product {
        name: req.name,
        price: req.price,
        image: req.image,
        description: req.description,
        short_description: req.short_description,
        created_at: now_secs(),
    };

    let mut con = connect(&state).await?;
    let created = storage::product::create_product(&mut con, &product).await?;
    if !created {
        return Err(AppError::Conflict(format!(
            "Product '{}' already exists",
            product.name
        )));
    }

    tracing::info!(action = "product_created", name = %product.name, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": product
        })),
    ))
}

/// PATCH /api/products/:name — Partially update a product (admin only)
///
/// Only fields present in the body change; `"image": null` clears the
/// image. Renaming moves the record to the new name.
pub async fn update_product(
    AdminClaims(_claims): AdminClaims,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_product_name(&name)?;
    if req.is_empty() {
        return Err(AppError::BadRequest(
            "No valid fields provided for update".to_string(),
        ));
    }
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(ref new_name) = req.name {
        validate_product_name(new_name)?;
    }
    // A patch must not drive a field into a state creation would reject.
    if req.description.as_deref() == Some("") {
        return Err(AppError::BadRequest(
            "Description must not be empty".to_string(),
        ));
    }
    if req.short_description.as_deref() == Some("") {
        return Err(AppError::BadRequest(
            "Short description must not be empty".to_string(),
        ));
    }

    let mut con = connect(&state).await?;
    let mut product = storage::product::get_product(&mut con, &name)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if let Some(new_name) = req.name {
        product.name = new_name;
    }
    if let Some(price) = req.price {
        product.price = price;
    }
    if let Some(image) = req.image {
        product.image = image;
    }
    if let Some(description) = req.description {
        product.description = description;
    }
    if let Some(short_description) = req.short_description {
        product.short_description = short_description;
    }

    if product.name != name {
        let moved = storage::product::rename_product(&mut con, &name, &product).await?;
        if !moved {
            return Err(AppError::Conflict(format!(
                "Product '{}' already exists",
                product.name
            )));
        }
    } else {
        storage::product::put_product(&mut con, &product).await?;
    }

    tracing::info!(action = "product_updated", name = %product.name, "Product updated");

    Ok(Json(json!({
        "success": true,
        "data": product
    })))
}

/// DELETE /api/products/:name — Delete a product (admin only)
pub async fn delete_product(
    AdminClaims(_claims): AdminClaims,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_product_name(&name)?;

    let mut con = connect(&state).await?;
    let deleted = storage::product::delete_product(&mut con, &name).await?;
    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    tracing::info!(action = "product_deleted", name = %name, "Product deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Product deleted successfully",
        "data": { "name": name }
    })))
}
