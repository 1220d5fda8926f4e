use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product, ProductSort};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a new product, assigning its id and creation time
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    async fn list(&self, sort: ProductSort) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Remove a product, returning it if it existed
    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Remove every product, returning how many were removed
    async fn delete_all(&self) -> ProductResult<u64>;

    /// Bulk insert, returning how many were stored
    async fn insert_many(&self, inputs: Vec<NewProduct>) -> ProductResult<u64>;

    async fn count(&self) -> ProductResult<u64>;
}

/// In-memory implementation for tests and running without MongoDB
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed product, keeping its id and timestamp
    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.products
            .write()
            .await
            .insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn list(&self, sort: ProductSort) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut result: Vec<Product> = products.values().cloned().collect();

        // v7 ids grow with creation time, so they break timestamp ties
        match sort {
            ProductSort::NewestFirst => result.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
            ProductSort::Unspecified => result.sort_by_key(|p| p.id),
        }

        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.write().await.remove(&id))
    }

    async fn delete_all(&self) -> ProductResult<u64> {
        let mut products = self.products.write().await;
        let removed = products.len() as u64;
        products.clear();
        Ok(removed)
    }

    async fn insert_many(&self, inputs: Vec<NewProduct>) -> ProductResult<u64> {
        let now = Utc::now();
        let mut products = self.products.write().await;
        let inserted = inputs.len() as u64;
        for input in inputs {
            let product = Product::with_created_at(input, now);
            products.insert(product.id, product);
        }
        Ok(inserted)
    }

    async fn count(&self) -> ProductResult<u64> {
        Ok(self.products.read().await.len() as u64)
    }
}
