use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{Product, ProductPredicate, ResponseEnvelope};

/// Product persistence with the catalog's business rules applied.
///
/// Writes never fail at the type level: duplicate names, unknown ids and
/// storage failures all come back as a `ResponseEnvelope` with
/// `success = false`. Reads return `Ok(None)` / `Ok(vec![])` for absence and
/// `Err` only when the store itself fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product unless one with the same name exists. `product.id` is ignored.
    async fn create(&self, product: Product) -> ResponseEnvelope;

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// All products in natural (primary-key) order.
    async fn get_all(&self) -> ProductResult<Vec<Product>>;

    /// First product (lowest id) satisfying every field of `predicate`.
    async fn get_by(&self, predicate: ProductPredicate) -> ProductResult<Option<Product>>;

    /// Replace every field of the product with `product.id`. Names are not re-checked.
    async fn update(&self, product: Product) -> ResponseEnvelope;

    /// Remove the product with `product.id`.
    async fn delete(&self, product: Product) -> ResponseEnvelope;
}

/// Client-visible outcome messages shared by every implementation.
pub(crate) mod messages {
    pub const CREATE_FAILED: &str = "Error occurred adding new product";
    pub const UPDATE_FAILED: &str = "Error occurred updating product";
    pub const DELETE_FAILED: &str = "Error occurred deleting product";
    pub const READ_ONE_FAILED: &str = "Error occurred retrieving product";
    pub const READ_ALL_FAILED: &str = "Error occurred retrieving products";

    pub fn already_added(name: &str) -> String {
        format!("{name} already added")
    }

    pub fn added(name: &str) -> String {
        format!("{name} added to database successfully")
    }

    pub fn not_added(name: &str) -> String {
        format!("Error occurred while adding {name}")
    }

    pub fn update_target_missing(name: &str) -> String {
        format!("{name} not found!")
    }

    pub fn updated(name: &str) -> String {
        format!("{name} is updated successfully")
    }

    pub fn delete_target_missing(name: &str) -> String {
        format!("{name} not found")
    }

    pub fn deleted(name: &str) -> String {
        format!("{name} is deleted succesfully!")
    }
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    state: Arc<RwLock<Store>>,
}

#[derive(Debug)]
struct Store {
    products: BTreeMap<i32, Product>,
    next_id: i32,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(Store {
                products: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, mut product: Product) -> ResponseEnvelope {
        let mut state = self.state.write().await;

        if state.products.values().any(|p| p.name == product.name) {
            return ResponseEnvelope::fail(messages::already_added(&product.name));
        }

        product.id = state.next_id;
        state.next_id += 1;

        let message = messages::added(&product.name);
        tracing::info!(product_id = product.id, "Created product");
        state.products.insert(product.id, product);

        ResponseEnvelope::ok(message)
    }

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state.products.values().cloned().collect())
    }

    async fn get_by(&self, predicate: ProductPredicate) -> ProductResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .find(|p| predicate.matches(p))
            .cloned())
    }

    async fn update(&self, product: Product) -> ResponseEnvelope {
        let mut state = self.state.write().await;

        match state.products.get_mut(&product.id) {
            Some(existing) => {
                let message = messages::updated(&product.name);
                *existing = product;
                tracing::info!(product_id = existing.id, "Updated product");
                ResponseEnvelope::ok(message)
            }
            None => ResponseEnvelope::fail(messages::update_target_missing(&product.name)),
        }
    }

    async fn delete(&self, product: Product) -> ResponseEnvelope {
        let mut state = self.state.write().await;

        match state.products.remove(&product.id) {
            Some(_) => {
                tracing::info!(product_id = product.id, "Deleted product");
                ResponseEnvelope::ok(messages::deleted(&product.name))
            }
            None => ResponseEnvelope::fail(messages::delete_target_missing(&product.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, quantity: i32) -> Product {
        Product {
            id: 0,
            name: name.to_string(),
            quantity,
            price: Decimal::new(999, 2),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_positive_ids() {
        let repo = InMemoryProductRepository::new();

        let envelope = repo.create(product("Widget", 5)).await;
        assert_eq!(
            envelope,
            ResponseEnvelope::ok("Widget added to database successfully")
        );

        repo.create(product("Gadget", 2)).await;

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|p| p.id > 0));
        assert_eq!(all[0].name, "Widget");
        assert!(all[0].id < all[1].id);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let repo = InMemoryProductRepository::new();
        repo.create(product("Widget", 5)).await;

        let envelope = repo.create(product("Widget", 7)).await;

        assert_eq!(envelope, ResponseEnvelope::fail("Widget already added"));
        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        repo.create(product("Widget", 5)).await;
        let first = repo.get_all().await.unwrap().remove(0);

        repo.delete(first.clone()).await;
        repo.create(product("Widget", 5)).await;

        let recreated = repo.get_all().await.unwrap().remove(0);
        assert!(recreated.id > first.id);
    }

    #[tokio::test]
    async fn test_find_by_id_absent_is_none() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(repo.find_by_id(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_all_empty() {
        let repo = InMemoryProductRepository::new();
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_returns_first_match() {
        let repo = InMemoryProductRepository::new();
        repo.create(product("Widget", 5)).await;
        repo.create(product("Gadget", 9)).await;
        repo.create(product("Gizmo", 9)).await;

        let found = repo
            .get_by(ProductPredicate::default().with_quantity(9))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Gadget");

        let none = repo.get_by(ProductPredicate::by_name("Nope")).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let repo = InMemoryProductRepository::new();
        repo.create(product("Widget", 5)).await;
        let mut stored = repo.get_all().await.unwrap().remove(0);

        stored.name = "Widget Pro".to_string();
        stored.quantity = 8;
        stored.price = Decimal::new(1999, 2);
        let envelope = repo.update(stored.clone()).await;

        assert_eq!(envelope, ResponseEnvelope::ok("Widget Pro is updated successfully"));
        assert_eq!(repo.find_by_id(stored.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = InMemoryProductRepository::new();
        let mut ghost = product("Ghost", 1);
        ghost.id = 999;

        let envelope = repo.update(ghost).await;

        assert_eq!(envelope, ResponseEnvelope::fail("Ghost not found!"));
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_existing_and_unknown() {
        let repo = InMemoryProductRepository::new();
        repo.create(product("Widget", 5)).await;
        let stored = repo.get_all().await.unwrap().remove(0);

        let mut ghost = product("Ghost", 1);
        ghost.id = 999;
        assert_eq!(
            repo.delete(ghost).await,
            ResponseEnvelope::fail("Ghost not found")
        );
        assert_eq!(repo.get_all().await.unwrap().len(), 1);

        assert_eq!(
            repo.delete(stored).await,
            ResponseEnvelope::ok("Widget is deleted succesfully!")
        );
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
