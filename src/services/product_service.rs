use validator::Validate;

use crate::{
    dto::products::ProductPayload,
    error::AppResult,
    models::{Lookup, Product},
    state::AppState,
};

pub async fn list_all(state: &AppState) -> AppResult<Vec<Product>> {
    tracing::info!("fetching all products");
    let products = state.products.find_all().await?;
    tracing::debug!(count = products.len(), "products found");
    Ok(products)
}

pub async fn get_by_id(state: &AppState, id: i64) -> AppResult<Lookup<Product>> {
    tracing::info!(id, "fetching product by id");
    let product = state.products.find_by_id(id).await?;
    match &product {
        Some(p) => tracing::debug!(?p, "product found"),
        None => tracing::warn!(id, "no product found"),
    }
    Ok(product.into())
}

pub async fn create(state: &AppState, payload: ProductPayload) -> AppResult<Product> {
    tracing::info!(?payload, "creating product");
    payload.validate()?;
    let product = state.products.insert(payload).await?;
    tracing::debug!(id = product.id, "product created");
    Ok(product)
}

/// Overwrites all four mutable fields; nothing from the stored row is merged in.
pub async fn update(
    state: &AppState,
    id: i64,
    payload: ProductPayload,
) -> AppResult<Lookup<Product>> {
    tracing::info!(id, "updating product");
    let existing = match state.products.find_by_id(id).await? {
        Some(p) => p,
        None => return Ok(Lookup::Absent),
    };
    tracing::debug!(?existing, "existing product before update");

    let replacement = Product {
        id: existing.id,
        name: payload.name,
        description: payload.description,
        price: payload.price,
        category: payload.category,
    };
    let updated = state.products.save(replacement).await?;
    tracing::debug!(?updated, "updated product");
    Ok(Lookup::Found(updated))
}

pub async fn delete(state: &AppState, id: i64) -> AppResult<()> {
    tracing::info!(id, "deleting product");
    let removed = state.products.delete_by_id(id).await?;
    tracing::debug!(id, removed, "product delete finished");
    Ok(())
}

pub async fn search(state: &AppState, query: &str) -> AppResult<Vec<Product>> {
    tracing::info!(query, "searching products");
    let results = state.products.search_by_name_or_category(query).await?;
    tracing::debug!(count = results.len(), "search results");
    Ok(results)
}

pub async fn find_by_category(state: &AppState, category: &str) -> AppResult<Vec<Product>> {
    tracing::info!(category, "fetching products by category");
    let results = state.products.find_by_category_ignore_case(category).await?;
    tracing::debug!(category, count = results.len(), "products found in category");
    Ok(results)
}
