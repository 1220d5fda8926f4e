//! Request extractors for the products endpoints.

use axum::{
    extract::{multipart::Field, FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{header, request::Parts, StatusCode},
    Json,
};
use axum_helpers::AppError;
use uuid::Uuid;

use crate::error::ProductError;
use crate::images::ImageUpload;
use crate::models::{CreateProductRequest, SizesInput, MAX_IMAGES};

/// Product id from the path. Anything that is not a UUID cannot name a
/// product, so it is rejected as not found.
pub struct ProductId(pub Uuid);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = ProductError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ProductError::NotFound)?;

        Uuid::parse_str(&raw)
            .map(ProductId)
            .map_err(|_| ProductError::NotFound)
    }
}

/// Body of a create request: product fields plus any attached files.
///
/// `multipart/form-data` bodies carry up to five file parts named `images`
/// and text parts `name`, `price`, `category`, `description`, `sizes`.
/// Any other content type is read as JSON. Field rules are checked later by
/// the service, after the image requirement.
#[derive(Debug)]
pub struct CreateProductPayload {
    pub request: CreateProductRequest,
    pub uploads: Vec<ImageUpload>,
}

impl<S> FromRequest<S> for CreateProductPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let Json(request) = Json::<CreateProductRequest>::from_request(req, state).await?;
        Ok(Self {
            request,
            uploads: Vec::new(),
        })
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

async fn read_multipart(mut multipart: Multipart) -> Result<CreateProductPayload, AppError> {
    let mut request = CreateProductRequest::default();
    let mut price: Option<String> = None;
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "images" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part for an unused file input.
                if bytes.is_empty() {
                    continue;
                }
                if uploads.len() == MAX_IMAGES {
                    return Err(AppError::BadRequest(format!(
                        "Too many images: at most {MAX_IMAGES} allowed"
                    )));
                }

                let mut upload = ImageUpload::new(bytes, content_type);
                upload.file_name = file_name;
                uploads.push(upload);
            }
            "name" => request.name = field_text(field).await?,
            "price" => price = Some(field_text(field).await?),
            "category" => request.category = field_text(field).await?,
            "description" => request.description = field_text(field).await?,
            "sizes" => request.sizes = Some(SizesInput::Csv(field_text(field).await?)),
            _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    // A missing price is left to validation so the image check runs first.
    request.price = match price.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
            AppError::BadRequest(format!("price must be a number, got '{raw}'"))
        })?),
    };

    Ok(CreateProductPayload { request, uploads })
}
