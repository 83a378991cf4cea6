//! Object storage for product media.
//!
//! Uploads go to a single bucket under a random file name; the returned
//! public URL is what the product's media list stores.

pub mod http;
pub mod memory;

use catalog_core::MediaKind;
use thiserror::Error;

pub use http::HttpObjectStorage;
pub use memory::InMemoryStorage;

/// Errors that can occur when storing media.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The object path or base URL cannot form a valid URL.
    #[error("invalid object URL: {0}")]
    InvalidUrl(String),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, used for its extension.
    pub file_name: String,
    /// MIME type reported for the file.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Image or video, or `None` for unsupported types.
    #[must_use]
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_content_type(&self.content_type)
    }
}

/// Stores uploaded files and hands out their public URLs.
#[allow(async_fn_in_trait)]
pub trait ObjectStorage {
    /// Store `file` at `path` and return its public URL.
    async fn upload(&self, path: &str, file: &UploadFile) -> Result<String, StorageError>;
}
