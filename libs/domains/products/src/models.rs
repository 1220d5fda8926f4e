use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Sizes a product gets when none are given
pub const DEFAULT_SIZES: [&str; 3] = ["S", "M", "L"];

/// Most images a single product may carry
pub const MAX_IMAGES: usize = 5;

/// Product entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    /// Public image URLs, in upload order
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

/// A product ready to be stored; the repository assigns id and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
}

impl Product {
    pub fn new(input: NewProduct) -> Self {
        Self::with_created_at(input, Utc::now())
    }

    pub fn with_created_at(input: NewProduct, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            price: input.price,
            category: input.category,
            description: input.description,
            images: input.images,
            sizes: input.sizes,
            created_at,
        }
    }
}

/// Ordering for [`crate::ProductRepository::list`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// `created_at` descending
    #[default]
    NewestFirst,
    /// Whatever order storage yields
    Unspecified,
}

/// `sizes` as sent by clients: a list or a comma-separated string
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SizesInput {
    List(Vec<String>),
    Csv(String),
}

impl SizesInput {
    pub fn into_sizes(self) -> Vec<String> {
        match self {
            SizesInput::List(list) => normalize_sizes(list),
            SizesInput::Csv(csv) => parse_sizes(&csv),
        }
    }
}

/// Splits a comma-separated size list, e.g. `"S, M,L"`.
pub fn parse_sizes(raw: &str) -> Vec<String> {
    normalize_sizes(raw.split(','))
}

/// Trims entries, drops blanks and repeats (first occurrence wins).
///
/// An empty result falls back to [`DEFAULT_SIZES`].
pub fn normalize_sizes<I, S>(sizes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for size in sizes {
        let size = size.as_ref().trim();
        if !size.is_empty() && !out.iter().any(|s| s == size) {
            out.push(size.to_string());
        }
    }

    if out.is_empty() {
        default_sizes()
    } else {
        out
    }
}

pub fn default_sizes() -> Vec<String> {
    DEFAULT_SIZES.iter().map(|s| s.to_string()).collect()
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    let message = if !price.is_finite() {
        "must be a finite number"
    } else if price < 0.0 {
        "must not be negative"
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new("price");
    err.message = Some(message.into());
    Err(err)
}

/// Body of `POST /api/products`, from JSON or multipart text fields
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(required(message = "is required"), custom(function = "validate_price"))]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Already-hosted image URLs (JSON bodies only)
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>, example = json!(["S", "M", "L"]))]
    pub sizes: Option<SizesInput>,
}

impl CreateProductRequest {
    /// Non-blank image URLs supplied in the body
    pub fn image_urls(&self) -> Vec<String> {
        self.images
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn sizes(&self) -> Vec<String> {
        self.sizes
            .clone()
            .map(SizesInput::into_sizes)
            .unwrap_or_else(default_sizes)
    }
}

/// `{"message": ...}` success body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
