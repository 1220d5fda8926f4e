use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use core_config::cloudinary::CloudinaryConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::instrument;

use super::{ImageStore, ImageUpload, StoredImage};
use crate::error::{ProductError, ProductResult};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Cloudinary upload API client using signed requests
#[derive(Clone)]
pub struct CloudinaryImageStore {
    http: reqwest::Client,
    config: CloudinaryConfig,
    base_url: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Hex SHA-256 over `k1=v1&k2=v2...` (keys sorted) followed by the secret.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{to_sign}{api_secret}")))
}

impl CloudinaryImageStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self {
            http,
            config,
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point at another API host, e.g. a local mock server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.base_url, self.config.cloud_name, action
        )
    }

    /// Adds timestamp, api key and signature to the parameters being signed.
    fn signed_form(&self, mut params: BTreeMap<&'static str, String>) -> Vec<(&'static str, String)> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign_params(&params, &self.config.api_secret);

        let mut form: Vec<(&'static str, String)> = params.into_iter().collect();
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));
        form.push(("signature_algorithm", "sha256".to_string()));
        form
    }

    async fn post_form(
        &self,
        action: &str,
        form: Vec<(&'static str, String)>,
    ) -> ProductResult<reqwest::Response> {
        let response = self
            .http
            .post(self.endpoint(action))
            .form(&form)
            .send()
            .await
            .map_err(|e| ProductError::Upload(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        Err(ProductError::Upload(format!(
            "Cloudinary {action} failed ({status}): {message}"
        )))
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    #[instrument(skip(self, image), fields(size = image.bytes.len(), content_type = %image.content_type))]
    async fn upload(&self, image: ImageUpload, folder: &str) -> ProductResult<StoredImage> {
        let data_uri = format!(
            "data:{};base64,{}",
            image.content_type,
            STANDARD.encode(&image.bytes)
        );

        let mut form = self.signed_form(BTreeMap::from([("folder", folder.to_string())]));
        form.push(("file", data_uri));

        let uploaded: UploadResponse = self
            .post_form("upload", form)
            .await?
            .json()
            .await
            .map_err(|e| ProductError::Upload(format!("Unexpected Cloudinary response: {e}")))?;

        tracing::info!(public_id = %uploaded.public_id, "Image uploaded");
        Ok(StoredImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, public_id: &str) -> ProductResult<()> {
        let form = self.signed_form(BTreeMap::from([("public_id", public_id.to_string())]));
        self.post_form("destroy", form).await?;
        tracing::info!(public_id, "Image deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn store(server: &MockServer) -> CloudinaryImageStore {
        CloudinaryImageStore::new(CloudinaryConfig::new("demo", "1234", "s3cret"))
            .with_base_url(server.base_url())
    }

    #[test]
    fn signature_covers_sorted_params_and_secret() {
        let params = BTreeMap::from([
            ("timestamp", "1315060510".to_string()),
            ("folder", "sabc4-store".to_string()),
        ]);

        let expected = format!(
            "{:x}",
            Sha256::digest("folder=sabc4-store&timestamp=1315060510abcd")
        );
        assert_eq!(sign_params(&params, "abcd"), expected);
        assert_eq!(expected.len(), 64);
    }

    #[test]
    fn signature_changes_with_secret() {
        let params = BTreeMap::from([("public_id", "sabc4-store/a".to_string())]);
        assert_ne!(sign_params(&params, "one"), sign_params(&params, "two"));
    }

    #[tokio::test]
    async fn upload_returns_secure_url() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo/image/upload");
                then.status(200).json_body(json!({
                    "public_id": "sabc4-store/heritage-tee",
                    "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/sabc4-store/heritage-tee.jpg",
                    "format": "jpg"
                }));
            })
            .await;

        let stored = store(&server)
            .upload(ImageUpload::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg"), "sabc4-store")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(stored.public_id, "sabc4-store/heritage-tee");
        assert!(stored.url.starts_with("https://res.cloudinary.com/demo/"));
    }

    #[tokio::test]
    async fn upload_surfaces_remote_error_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo/image/upload");
                then.status(401)
                    .json_body(json!({ "error": { "message": "Invalid Signature" } }));
            })
            .await;

        let err = store(&server)
            .upload(ImageUpload::new(vec![1, 2, 3], "image/png"), "sabc4-store")
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Upload(_)));
        assert!(err.to_string().contains("Invalid Signature"));
    }

    #[tokio::test]
    async fn delete_posts_to_destroy() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo/image/destroy");
                then.status(200).json_body(json!({ "result": "ok" }));
            })
            .await;

        store(&server).delete("sabc4-store/heritage-tee").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_an_upload_error() {
        let store = CloudinaryImageStore::new(CloudinaryConfig::new("demo", "k", "s"))
            .with_base_url("http://127.0.0.1:1");

        let err = store
            .upload(ImageUpload::new(vec![1], "image/png"), "sabc4-store")
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Upload(_)));
    }
}
