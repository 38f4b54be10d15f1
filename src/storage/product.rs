//! Product Redis operations.
//!
//! Redis key pattern:
//! - `product:{name}` — product data (JSON), keyed by the unique name
//!
//! The product name is the primary key: creation uses SET NX so a duplicate
//! name never silently overwrites an existing record, and a rename moves
//! the record to its new key in one transaction.

use crate::models::Product;
use redis::AsyncCommands;

fn product_key(name: &str) -> String {
    format!("product:{}", name)
}

fn to_json(product: &Product) -> Result<String, redis::RedisError> {
    serde_json::to_string(product).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON serialize",
            e.to_string(),
        ))
    })
}

fn from_json(json: &str) -> Result<Product, redis::RedisError> {
    serde_json::from_str(json).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON deserialize",
            e.to_string(),
        ))
    })
}

/// Store a new product. Returns false when the name is already taken.
pub async fn create_product<C>(con: &mut C, product: &Product) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(product)?;
    let created: bool = con.set_nx(product_key(&product.name), json).await?;
    Ok(created)
}

/// Get a product by name.
pub async fn get_product<C>(con: &mut C, name: &str) -> Result<Option<Product>, redis::RedisError>
where
    C: AsyncCommands,
{
    let json: Option<String> = con.get(product_key(name)).await?;
    json.as_deref().map(from_json).transpose()
}

/// Overwrite an existing product in place (same name).
pub async fn put_product<C>(con: &mut C, product: &Product) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(product)?;
    con.set::<_, _, ()>(product_key(&product.name), json).await
}

/// Move a product record to a new name.
///
/// Returns false on collision with an existing record. The write of the
/// new key and the delete of the old one run in a single MULTI/EXEC, so
/// the record is never stored under both names.
pub async fn rename_product<C>(
    con: &mut C,
    old_name: &str,
    product: &Product,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(product)?;
    let new_key = product_key(&product.name);

    let taken: bool = con.exists(&new_key).await?;
    if taken {
        return Ok(false);
    }

    let _: () = redis::pipe()
        .atomic()
        .set(&new_key, json)
        .ignore()
        .del(product_key(old_name))
        .ignore()
        .query_async(con)
        .await?;
    Ok(true)
}

/// Delete a product by name. Returns false when it did not exist.
pub async fn delete_product<C>(con: &mut C, name: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let deleted: usize = con.del(product_key(name)).await?;
    Ok(deleted > 0)
}

/// List all products, newest first.
///
/// Scans for `product:*` keys and deserializes each. Records that fail to
/// parse are skipped rather than failing the whole listing.
pub async fn list_products<C>(con: &mut C) -> Result<Vec<Product>, redis::RedisError>
where
    C: AsyncCommands,
{
    let keys = super::scan_keys(con, "product:*").await?;

    let mut products = Vec::with_capacity(keys.len());
    for key in keys {
        let json: Option<String> = con.get(&key).await?;
        if let Some(data) = json {
            match from_json(&data) {
                Ok(product) => products.push(product),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping unreadable product record")
                }
            }
        }
    }

    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(products)
}
