//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::images::{self, ImageStore, ImageUpload};
use crate::models::{CreateProductRequest, NewProduct, Product, ProductSort, MAX_IMAGES};
use crate::repository::ProductRepository;

/// How product creation treats images
#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Remote folder uploads go into
    pub folder: String,
    /// Reject products without any image
    pub require_images: bool,
}

impl UploadSettings {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            require_images: true,
        }
    }

    pub fn require_images(mut self, required: bool) -> Self {
        self.require_images = required;
        self
    }
}

/// Product service providing business logic operations
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    images: Arc<dyn ImageStore>,
    settings: UploadSettings,
}

// Manual impl: a derive would require `R: Clone`
impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: Arc::clone(&self.images),
            settings: self.settings.clone(),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, images: Arc<dyn ImageStore>, settings: UploadSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
            settings,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validate, host the attached images, then store the product.
    ///
    /// Images are uploaded concurrently and kept in submission order, after
    /// any URLs already present in the request. If storing the product fails,
    /// the freshly uploaded images are deleted again.
    #[instrument(skip(self, request, uploads), fields(product_name = %request.name, uploads = uploads.len()))]
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
        uploads: Vec<ImageUpload>,
    ) -> ProductResult<Product> {
        let mut image_urls = request.image_urls();
        if self.settings.require_images && uploads.is_empty() && image_urls.is_empty() {
            return Err(ProductError::Validation("No images uploaded".to_string()));
        }

        request.validate()?;
        let Some(price) = request.price else {
            return Err(ProductError::Validation("price: is required".to_string()));
        };

        if image_urls.len() + uploads.len() > MAX_IMAGES {
            return Err(ProductError::Validation(format!(
                "Too many images: at most {MAX_IMAGES} allowed"
            )));
        }

        let stored =
            images::upload_all(self.images.as_ref(), uploads, &self.settings.folder).await?;
        image_urls.extend(stored.iter().map(|image| image.url.clone()));

        let sizes = request.sizes();
        let input = NewProduct {
            name: request.name,
            price,
            category: request.category,
            description: request.description,
            images: image_urls,
            sizes,
        };

        match self.repository.create(input).await {
            Ok(product) => Ok(product),
            Err(err) => {
                if !stored.is_empty() {
                    warn!(error = %err, uploaded = stored.len(), "Insert failed, removing uploaded images");
                    images::delete_all(self.images.as_ref(), &stored).await;
                }
                Err(err)
            }
        }
    }

    /// All products, newest first
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list(ProductSort::NewestFirst).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Delete a product, returning what was removed
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .delete(id)
            .await?
            .ok_or(ProductError::NotFound)
    }
}
