//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, ProductSort};
use crate::repository::ProductRepository;

/// Stored shape of a product.
///
/// `_id` holds the hyphenated UUID string and `createdAt` is a BSON date so the
/// server can sort on it. Documents written before multi-image support carry a
/// single `image` instead of `images`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}

impl From<Product> for ProductDocument {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            price: product.price,
            category: product.category,
            description: product.description,
            images: product.images,
            image: None,
            sizes: product.sizes,
            created_at: bson::DateTime::from_millis(product.created_at.timestamp_millis()),
        }
    }
}

impl TryFrom<ProductDocument> for Product {
    type Error = ProductError;

    fn try_from(doc: ProductDocument) -> ProductResult<Self> {
        let id = Uuid::parse_str(&doc.id)
            .map_err(|e| ProductError::Database(format!("invalid product id '{}': {e}", doc.id)))?;
        let created_at = chrono::DateTime::from_timestamp_millis(doc.created_at.timestamp_millis())
            .unwrap_or_default();
        let images = match (doc.images.is_empty(), doc.image) {
            (true, Some(legacy)) if !legacy.is_empty() => vec![legacy],
            _ => doc.images,
        };

        Ok(Self {
            id,
            name: doc.name,
            price: doc.price,
            category: doc.category,
            description: doc.description,
            images,
            sizes: doc.sizes,
            created_at,
        })
    }
}

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, "products")
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ProductDocument>(collection_name),
        }
    }

    /// Create the `createdAt` descending index used by the newest-first listing
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<ProductDocument> {
        &self.collection
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.to_string() }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        let document = ProductDocument::from(product.clone());

        self.collection.insert_one(&document).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        // Return what a later read yields (millisecond timestamp)
        document.try_into()
    }

    #[instrument(skip(self))]
    async fn list(&self, sort: ProductSort) -> ProductResult<Vec<Product>> {
        let find = self.collection.find(doc! {});
        let cursor = match sort {
            ProductSort::NewestFirst => find.sort(doc! { "createdAt": -1, "_id": -1 }).await?,
            ProductSort::Unspecified => find.await?,
        };

        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        documents.into_iter().map(Product::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let document = self.collection.find_one(Self::id_filter(id)).await?;
        document.map(Product::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let deleted = self
            .collection
            .find_one_and_delete(Self::id_filter(id))
            .await?;

        if deleted.is_some() {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        deleted.map(Product::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> ProductResult<u64> {
        let result = self.collection.delete_many(doc! {}).await?;
        tracing::info!(deleted = result.deleted_count, "Deleted all products");
        Ok(result.deleted_count)
    }

    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    async fn insert_many(&self, inputs: Vec<NewProduct>) -> ProductResult<u64> {
        if inputs.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now();
        let documents: Vec<ProductDocument> = inputs
            .into_iter()
            .map(|input| Product::with_created_at(input, now).into())
            .collect();

        let result = self.collection.insert_many(documents).await?;
        Ok(result.inserted_ids.len() as u64)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> ProductResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
