//! Handler tests for Products domain
//!
//! These drive the products router directly with `oneshot`, backed by the
//! in-memory repository and a recording image store:
//! - JSON and multipart request parsing
//! - Response serialization and status codes
//! - `{"message": ...}` error bodies

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

const BOUNDARY: &str = "----catalog-test-boundary";

/// Image store that records calls and can be told to fail specific files
#[derive(Default)]
struct RecordingImageStore {
    uploaded: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    fail_file: Option<String>,
}

impl RecordingImageStore {
    fn failing_on(file_name: &str) -> Self {
        Self {
            fail_file: Some(file_name.to_string()),
            ..Default::default()
        }
    }

    fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn upload(&self, image: ImageUpload, folder: &str) -> ProductResult<StoredImage> {
        let name = image.file_name.unwrap_or_else(|| "unnamed".to_string());
        if self.fail_file.as_deref() == Some(name.as_str()) {
            return Err(ProductError::Upload(format!("Cloudinary rejected {name}")));
        }

        self.uploaded.lock().unwrap().push(name.clone());
        Ok(StoredImage {
            url: format!("https://res.cloudinary.com/demo/image/upload/{folder}/{name}"),
            public_id: format!("{folder}/{name}"),
        })
    }

    async fn delete(&self, public_id: &str) -> ProductResult<()> {
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

struct TestApp {
    router: Router,
    repo: InMemoryProductRepository,
    images: Arc<RecordingImageStore>,
}

fn app_with(images: RecordingImageStore, settings: UploadSettings) -> TestApp {
    let repo = InMemoryProductRepository::new();
    let images = Arc::new(images);
    let service = ProductService::new(repo.clone(), images.clone(), settings);

    TestApp {
        router: handlers::router(service),
        repo,
        images,
    }
}

fn app() -> TestApp {
    app_with(
        RecordingImageStore::default(),
        UploadSettings::new("sabc4-store"),
    )
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builds a multipart body from text fields and `images` file parts
fn multipart_request(fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

#[tokio::test]
async fn test_multipart_create_returns_201_with_ordered_images() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("multipart_create");
    let name = builder.name("product", "tee");

    let request = multipart_request(
        &[
            ("name", name.as_str()),
            ("price", "450"),
            ("category", "T-Shirts"),
            ("description", "Premium cotton tee"),
            ("sizes", "S, M,L,XL"),
        ],
        &[("front.jpg", JPEG), ("back.jpg", JPEG), ("detail.jpg", JPEG)],
    );

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Product = json_body(response.into_body()).await;
    assert_eq!(created.name, name);
    assert_eq!(created.price, 450.0);
    assert_eq!(created.sizes, vec!["S", "M", "L", "XL"]);
    assert_eq!(
        created.images,
        vec![
            "https://res.cloudinary.com/demo/image/upload/sabc4-store/front.jpg",
            "https://res.cloudinary.com/demo/image/upload/sabc4-store/back.jpg",
            "https://res.cloudinary.com/demo/image/upload/sabc4-store/detail.jpg",
        ]
    );

    // Read it back through the API
    let response = app
        .router
        .oneshot(empty_request("GET", &format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Product = json_body(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_multipart_without_sizes_uses_defaults() {
    let app = app();

    let request = multipart_request(
        &[("name", "Bucket Hat"), ("price", "300"), ("category", "Accessories")],
        &[("hat.jpg", JPEG)],
    );

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Product = json_body(response.into_body()).await;
    assert_eq!(created.sizes, vec!["S", "M", "L"]);
    assert_eq!(created.description, "");
}

#[tokio::test]
async fn test_create_without_images_returns_400() {
    let app = app();

    let request = multipart_request(&[("name", "Hoodie"), ("price", "850")], &[]);
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "message": "No images uploaded" }));
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_with_six_images_returns_400() {
    let app = app();
    let files: Vec<(&str, &[u8])> = vec![
        ("1.jpg", JPEG),
        ("2.jpg", JPEG),
        ("3.jpg", JPEG),
        ("4.jpg", JPEG),
        ("5.jpg", JPEG),
        ("6.jpg", JPEG),
    ];

    let request = multipart_request(&[("name", "Tee"), ("price", "1")], &files);
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Too many images: at most 5 allowed");
    assert!(app.images.uploaded().is_empty());
}

#[tokio::test]
async fn test_multipart_invalid_price_returns_400() {
    let app = app();

    let request = multipart_request(&[("name", "Tee"), ("price", "cheap")], &[("a.jpg", JPEG)]);
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert!(body["message"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn test_missing_images_reported_before_other_fields() {
    let app = app();

    let request = multipart_request(&[("name", "Tee")], &[]);
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "message": "No images uploaded" }));
}

#[tokio::test]
async fn test_multipart_missing_price_returns_400() {
    let app = app();

    let request = multipart_request(&[("name", "Tee")], &[("a.jpg", JPEG)]);
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "message": "price: is required" }));
    assert!(app.images.uploaded().is_empty());
}

#[tokio::test]
async fn test_multipart_non_finite_price_returns_400() {
    for price in ["NaN", "inf", "-infinity"] {
        let app = app();

        let request = multipart_request(&[("name", "Tee"), ("price", price)], &[("a.jpg", JPEG)]);
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "price {price}");
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["message"], "price: must be a finite number");
        assert_eq!(app.repo.count().await.unwrap(), 0);
        assert!(app.images.uploaded().is_empty());
    }
}

#[tokio::test]
async fn test_json_out_of_range_price_returns_400() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"name":"Tee","price":1e999,"images":["https://cdn/x.jpg"]}"#,
        ))
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_json_missing_fields_returns_400() {
    let app = app();

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert!(body["message"].as_str().unwrap().contains("name"));

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/", json!({ "name": "Tee", "price": "cheap" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let untyped = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"name":"Tee","price":1}"#))
        .unwrap();
    let response = app.router.oneshot(untyped).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_file_parts_do_not_count_towards_limit() {
    let app = app();
    let empty: &[u8] = &[];
    let files: Vec<(&str, &[u8])> = vec![
        ("1.jpg", JPEG),
        ("2.jpg", JPEG),
        ("3.jpg", JPEG),
        ("4.jpg", JPEG),
        ("5.jpg", JPEG),
        ("", empty),
    ];

    let request = multipart_request(&[("name", "Tee"), ("price", "450")], &files);
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Product = json_body(response.into_body()).await;
    assert_eq!(created.images.len(), 5);
    assert_eq!(app.images.uploaded().len(), 5);
}

#[tokio::test]
async fn test_json_create_with_image_urls() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("json_create");

    let request = json_request(
        "POST",
        "/",
        json!({
            "name": "Jozi Streets Hoodie",
            "price": builder.price(),
            "category": "Hoodies",
            "description": "Heavyweight fleece for the winter.",
            "images": [builder.image_url(0), builder.image_url(1)],
            "sizes": ["M", "L", "XL", "L"]
        }),
    );

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Product = json_body(response.into_body()).await;
    assert_eq!(created.images, vec![builder.image_url(0), builder.image_url(1)]);
    assert_eq!(created.sizes, vec!["M", "L", "XL"]);
    assert!(app.images.uploaded().is_empty());
}

#[tokio::test]
async fn test_json_create_validates_input() {
    let app = app();

    let request = json_request(
        "POST",
        "/",
        json!({ "name": "", "price": -10, "images": ["https://cdn/x.jpg"] }),
    );
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        "name: must not be empty; price: must not be negative"
    );
}

#[tokio::test]
async fn test_json_create_without_images_allowed_when_optional() {
    let app = app_with(
        RecordingImageStore::default(),
        UploadSettings::new("sabc4-store").require_images(false),
    );

    let request = json_request(
        "POST",
        "/",
        json!({ "name": "Sticker", "price": 15, "sizes": "" }),
    );
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Product = json_body(response.into_body()).await;
    assert!(created.images.is_empty());
    assert_eq!(created.sizes, vec!["S", "M", "L"]);
}

#[tokio::test]
async fn test_upload_failure_returns_500_and_cleans_up() {
    let app = app_with(
        RecordingImageStore::failing_on("broken.jpg"),
        UploadSettings::new("sabc4-store"),
    );

    let request = multipart_request(
        &[("name", "Cargo Pants"), ("price", "950")],
        &[("ok.jpg", JPEG), ("broken.jpg", JPEG)],
    );
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Cloudinary rejected broken.jpg");

    assert_eq!(app.images.uploaded(), vec!["ok.jpg"]);
    assert_eq!(app.images.deleted(), vec!["sabc4-store/ok.jpg"]);
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_returns_newest_first() {
    let app = app();
    let now = chrono::Utc::now();

    for (name, hours_ago) in [("middle", 2), ("newest", 0), ("oldest", 5)] {
        let input = NewProduct {
            name: name.to_string(),
            price: 100.0,
            category: "T-Shirts".to_string(),
            description: String::new(),
            images: vec![],
            sizes: vec!["S".to_string()],
        };
        app.repo
            .insert(Product::with_created_at(
                input,
                now - chrono::Duration::hours(hours_ago),
            ))
            .await;
    }

    let response = app.router.oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Product> = json_body(response.into_body()).await;
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn test_get_unknown_product_returns_404() {
    let app = app();

    let response = app
        .router
        .oneshot(empty_request("GET", &format!("/{}", uuid::Uuid::now_v7())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Product not found" }));
}

#[tokio::test]
async fn test_malformed_id_returns_404() {
    let app = app();

    for method in ["GET", "DELETE"] {
        let response = app
            .router
            .clone()
            .oneshot(empty_request(method, "/not-a-uuid"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body, json!({ "message": "Product not found" }));
    }
}

#[tokio::test]
async fn test_delete_product() {
    let app = app();
    let created = app
        .repo
        .create(NewProduct {
            name: "Soweto Bucket Hat".to_string(),
            price: 300.0,
            category: "Accessories".to_string(),
            description: "Essential summer accessory.".to_string(),
            images: vec!["https://cdn/hat.jpg".to_string()],
            sizes: vec!["One Size".to_string()],
        })
        .await
        .unwrap();

    let uri = format!("/{}", created.id);

    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Product deleted successfully" }));

    // Second delete and subsequent get both miss
    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.router.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_creates_do_not_overwrite() {
    let app = app();

    let first = app.router.clone().oneshot(multipart_request(
        &[("name", "First"), ("price", "10")],
        &[("first.jpg", JPEG)],
    ));
    let second = app.router.clone().oneshot(multipart_request(
        &[("name", "Second"), ("price", "20")],
        &[("second.jpg", JPEG)],
    ));

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap().status(), StatusCode::CREATED);
    assert_eq!(second.unwrap().status(), StatusCode::CREATED);

    let products = app.repo.list(ProductSort::Unspecified).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_ne!(products[0].id, products[1].id);
}
