//! Image hosting: the [`ImageStore`] seam, the Cloudinary client and the
//! concurrent upload fan-out used when creating products.

mod cloudinary;

pub use cloudinary::{sign_params, CloudinaryImageStore};

use async_trait::async_trait;
use axum::body::Bytes;
use futures::future::join_all;
use tracing::{instrument, warn};

use crate::error::{ProductError, ProductResult};

/// A file received from the client, not yet hosted
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A hosted image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public HTTPS URL
    pub url: String,
    /// Host-side identifier, needed to delete the image again
    pub public_id: String,
}

/// Remote media host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload one image into `folder`
    async fn upload(&self, image: ImageUpload, folder: &str) -> ProductResult<StoredImage>;

    /// Remove a previously uploaded image
    async fn delete(&self, public_id: &str) -> ProductResult<()>;
}

/// Upload every image concurrently, returning results in submission order.
///
/// Fails with the first error (in submission order) if any upload fails; the
/// uploads that did succeed are deleted before returning.
#[instrument(skip(store, uploads), fields(count = uploads.len()))]
pub async fn upload_all(
    store: &dyn ImageStore,
    uploads: Vec<ImageUpload>,
    folder: &str,
) -> ProductResult<Vec<StoredImage>> {
    let results = join_all(
        uploads
            .into_iter()
            .map(|upload| store.upload(upload, folder)),
    )
    .await;

    let mut stored = Vec::with_capacity(results.len());
    let mut first_error: Option<ProductError> = None;
    for result in results {
        match result {
            Ok(image) => stored.push(image),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        None => Ok(stored),
        Some(err) => {
            warn!(
                uploaded = stored.len(),
                error = %err,
                "Image upload failed, removing uploaded images"
            );
            delete_all(store, &stored).await;
            Err(err)
        }
    }
}

/// Best-effort removal; failures are logged and swallowed.
pub async fn delete_all(store: &dyn ImageStore, images: &[StoredImage]) {
    let results = join_all(images.iter().map(|image| store.delete(&image.public_id))).await;

    for (image, result) in images.iter().zip(results) {
        if let Err(e) = result {
            warn!(public_id = %image.public_id, error = %e, "Failed to delete uploaded image");
        }
    }
}
