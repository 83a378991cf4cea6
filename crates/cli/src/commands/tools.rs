//! Small helpers: SKUs, slugs and one-off uploads.
//!
//! ```bash
//! catalog-cli sku --count 3
//! catalog-cli slug "Body Wave 13x4 Lace"
//! catalog-cli upload ./front.jpg
//! ```

use std::path::Path;

use catalog_admin::AdminConfig;
use catalog_admin::storage::{HttpObjectStorage, ObjectStorage, UploadFile};
use catalog_core::{SkuGenerator, slugify, storage_file_name};
use thiserror::Error;
use uuid::Uuid;

use crate::form_file::content_type_for;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {0}")]
    Unsupported(String),
}

/// Print `count` generated SKUs using the configured prefix.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded.
pub fn sku(count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let skus = generate_skus(&SkuGenerator::new(&config.sku_prefix), count);

    #[allow(clippy::print_stdout)]
    {
        for sku in &skus {
            println!("{sku}");
        }
    }
    Ok(())
}

fn generate_skus(generator: &SkuGenerator, count: usize) -> Vec<String> {
    (0..count).map(|_| generator.generate()).collect()
}

/// Print the slug the form would derive from `text`.
pub fn slug(text: &str) {
    #[allow(clippy::print_stdout)]
    {
        println!("{}", slugify(text));
    }
}

/// Upload a single file and print its public URL.
///
/// # Errors
///
/// Returns an error if storage is not configured, the file cannot be read
/// or the upload fails.
pub async fn upload(
    path: &Path,
    content_type: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let storage = HttpObjectStorage::new(config.storage()?)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = content_type
        .map(ToString::to_string)
        .or_else(|| content_type_for(&file_name).map(ToString::to_string))
        .ok_or_else(|| UploadError::Unsupported(file_name.clone()))?;
    let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let file = UploadFile::new(file_name.as_str(), content_type, bytes);
    if file.kind().is_none() {
        return Err(UploadError::Unsupported(file.content_type).into());
    }

    let object_path = storage_file_name(&file_name, &Uuid::new_v4().simple().to_string());
    let url = storage.upload(&object_path, &file).await?;
    tracing::info!(path = %object_path, "Uploaded file");

    #[allow(clippy::print_stdout)]
    {
        println!("{url}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_skus_uses_prefix() {
        let skus = generate_skus(&SkuGenerator::new("wig"), 3);
        assert_eq!(skus.len(), 3);
        assert!(skus.iter().all(|sku| sku.starts_with("WIG-")));
    }

    #[test]
    fn test_generate_skus_zero() {
        assert!(generate_skus(&SkuGenerator::default(), 0).is_empty());
    }
}
