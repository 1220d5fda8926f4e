//! Products API routes

use std::sync::Arc;

use axum::Router;
use domain_products::{
    handlers, CloudinaryImageStore, MongoProductRepository, ProductService, UploadSettings,
};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::new(&state.db);
    let cloudinary = state.config.cloudinary.clone();
    let settings = UploadSettings::new(cloudinary.folder.clone())
        .require_images(state.config.image_upload_required);
    let images = Arc::new(CloudinaryImageStore::new(cloudinary));

    handlers::router(ProductService::new(repository, images, settings))
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoProductRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
