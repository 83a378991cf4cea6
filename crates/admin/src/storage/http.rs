//! HTTP object storage client.
//!
//! # API Reference
//!
//! - Upload: `POST {base}/storage/v1/object/{bucket}/{path}`
//! - Public URL: `{base}/storage/v1/object/public/{bucket}/{path}`
//! - Authentication: service key via `Authorization: Bearer <key>`

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;

use super::{ObjectStorage, StorageError, UploadFile};
use crate::config::StorageConfig;

/// Object storage reached over HTTP.
#[derive(Clone)]
pub struct HttpObjectStorage {
    inner: Arc<HttpObjectStorageInner>,
}

struct HttpObjectStorageInner {
    client: reqwest::Client,
    base_url: Url,
    bucket: String,
}

impl std::fmt::Debug for HttpObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpObjectStorage")
            .field("base_url", &self.inner.base_url.as_str())
            .field("bucket", &self.inner.bucket)
            .finish_non_exhaustive()
    }
}

impl HttpObjectStorage {
    /// Create a new storage client.
    ///
    /// # Errors
    ///
    /// Returns error if the service key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.service_key.expose_secret());
        let mut auth = HeaderValue::from_str(&auth_value)
            .map_err(|e| StorageError::Config(format!("Invalid service key format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpObjectStorageInner {
                client,
                base_url: config.base_url.clone(),
                bucket: config.bucket.clone(),
            }),
        })
    }

    /// The bucket uploads go to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.inner.bucket
    }

    /// URL an object is uploaded to.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidUrl` if the base URL cannot take a path.
    pub fn object_url(&self, path: &str) -> Result<Url, StorageError> {
        self.build_url(&["storage", "v1", "object"], path)
    }

    /// URL an object is publicly served from.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidUrl` if the base URL cannot take a path.
    pub fn public_url(&self, path: &str) -> Result<Url, StorageError> {
        self.build_url(&["storage", "v1", "object", "public"], path)
    }

    fn build_url(&self, prefix: &[&str], path: &str) -> Result<Url, StorageError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(prefix)
            .push(&self.inner.bucket)
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Turn a non-success response into an error.
    async fn parse_error(response: reqwest::Response) -> StorageError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) if !body.is_empty() => body,
            _ => "no response body".to_string(),
        };
        StorageError::Api { status, message }
    }
}

impl ObjectStorage for HttpObjectStorage {
    #[instrument(skip(self, file), fields(bucket = %self.inner.bucket, bytes = file.bytes.len()))]
    async fn upload(&self, path: &str, file: &UploadFile) -> Result<String, StorageError> {
        let url = self.object_url(path)?;

        let response = self
            .inner
            .client
            .post(url)
            .header(CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        let public = self.public_url(path)?;
        tracing::info!(url = %public, "Uploaded media");
        Ok(public.into())
    }
}
