use async_trait::async_trait;

use crate::{dto::products::ProductPayload, error::AppResult, models::Product};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProductRepository;
pub use postgres::SeaOrmProductRepository;

/// Storage operations the catalog needs from the relational store.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Product>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>>;

    /// Insert a new row; storage assigns the identifier.
    async fn insert(&self, payload: ProductPayload) -> AppResult<Product>;

    /// Overwrite every mutable column of an existing row.
    async fn save(&self, product: Product) -> AppResult<Product>;

    /// Returns the number of rows removed. Zero is not an error.
    async fn delete_by_id(&self, id: i64) -> AppResult<u64>;

    async fn find_by_category_ignore_case(&self, category: &str) -> AppResult<Vec<Product>>;

    /// Case-insensitive substring match. `%` and `_` in `query` match literally.
    async fn search_by_name_or_category(&self, query: &str) -> AppResult<Vec<Product>>;
}
