//! Products Domain
//!
//! Catalog of products stored in MongoDB, with images hosted on Cloudinary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart/JSON extraction
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │   Service   │ ──▶ │ Image store │  ← Cloudinary uploads
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use core_config::cloudinary::CloudinaryConfig;
//! use domain_products::{
//!     handlers, CloudinaryImageStore, MongoProductRepository, ProductService, UploadSettings,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let cloudinary = CloudinaryConfig::new("demo", "key", "secret");
//! let settings = UploadSettings::new(cloudinary.folder.clone());
//! let images = Arc::new(CloudinaryImageStore::new(cloudinary));
//!
//! let service = ProductService::new(MongoProductRepository::new(&db), images, settings);
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod images;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod seed;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use images::{CloudinaryImageStore, ImageStore, ImageUpload, StoredImage};
pub use models::{CreateProductRequest, NewProduct, Product, ProductSort, SizesInput};
pub use crate::mongodb::MongoProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use seed::{reseed, SeedReport};
pub use service::{ProductService, UploadSettings};
