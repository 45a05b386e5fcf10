use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{dto::products::ProductPayload, error::AppResult, models::Product};

use super::ProductRepository;

/// Process-local product store. Identifiers start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryProductRepository {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    last_id: i64,
    rows: BTreeMap<i64, Product>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn filtered(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.store()
            .rows
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> AppResult<Vec<Product>> {
        Ok(self.filtered(|_| true))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.store().rows.get(&id).cloned())
    }

    async fn insert(&self, payload: ProductPayload) -> AppResult<Product> {
        let mut store = self.store();
        store.last_id += 1;
        let product = Product {
            id: store.last_id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            category: payload.category,
        };
        store.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn save(&self, product: Product) -> AppResult<Product> {
        self.store().rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<u64> {
        Ok(self.store().rows.remove(&id).map_or(0, |_| 1))
    }

    async fn find_by_category_ignore_case(&self, category: &str) -> AppResult<Vec<Product>> {
        let category = category.to_lowercase();
        Ok(self.filtered(|p| p.category.to_lowercase() == category))
    }

    async fn search_by_name_or_category(&self, query: &str) -> AppResult<Vec<Product>> {
        let query = query.to_lowercase();
        Ok(self.filtered(|p| {
            p.name.to_lowercase().contains(&query) || p.category.to_lowercase().contains(&query)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, category: &str) -> ProductPayload {
        ProductPayload {
            name: name.into(),
            description: None,
            price: 10.0,
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let repo = InMemoryProductRepository::new();
        let a = repo.insert(payload("A", "x")).await.unwrap();
        let b = repo.insert(payload("B", "x")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        repo.delete_by_id(b.id).await.unwrap();
        let c = repo.insert(payload("C", "x")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn delete_reports_rows_removed() {
        let repo = InMemoryProductRepository::new();
        let a = repo.insert(payload("A", "x")).await.unwrap();
        assert_eq!(repo.delete_by_id(a.id).await.unwrap(), 1);
        assert_eq!(repo.delete_by_id(a.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn category_match_is_exact_but_case_insensitive() {
        let repo = InMemoryProductRepository::new();
        repo.insert(payload("A", "Category1")).await.unwrap();
        repo.insert(payload("B", "Category10")).await.unwrap();

        let found = repo.find_by_category_ignore_case("category1").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "A");
    }

    #[tokio::test]
    async fn search_matches_name_or_category() {
        let repo = InMemoryProductRepository::new();
        repo.insert(payload("Product A", "Tools")).await.unwrap();
        repo.insert(payload("Hammer", "Hardware")).await.unwrap();
        repo.insert(payload("Spoon", "Kitchen")).await.unwrap();

        let by_name = repo.search_by_name_or_category("prod").await.unwrap();
        assert_eq!(by_name.len(), 1);
        let by_category = repo.search_by_name_or_category("WARE").await.unwrap();
        assert_eq!(by_category[0].name, "Hammer");
        assert!(repo.search_by_name_or_category("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_treats_like_wildcards_literally() {
        let repo = InMemoryProductRepository::new();
        repo.insert(payload("50% off mug", "Kitchen")).await.unwrap();
        repo.insert(payload("500 gram flour", "Pantry")).await.unwrap();

        let found = repo.search_by_name_or_category("50%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "50% off mug");
        assert!(repo.search_by_name_or_category("_").await.unwrap().is_empty());
    }
}
