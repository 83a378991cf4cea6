//! Product commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a product from a form file
//! catalog-cli product save product.yaml
//!
//! # Apply a form file to an existing product
//! catalog-cli product save changes.yaml --product 12
//!
//! # Run the whole save against in-memory storage
//! catalog-cli product save product.yaml --dry-run
//!
//! # Print a stored product as JSON
//! catalog-cli product show 12
//!
//! # List the categories products can be filed under
//! catalog-cli product categories
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string
//! - `CATALOG_STORAGE_URL` / `CATALOG_STORAGE_KEY` - needed when the form file lists media

use std::path::Path;

use catalog_admin::db::{self, CategorySource, InMemoryCatalogStore, PgCatalogStore, ProductStore};
use catalog_admin::storage::{HttpObjectStorage, InMemoryStorage, ObjectStorage, UploadFile};
use catalog_admin::{AdminConfig, AppError, ProductForm, SaveOutcome, load_catalogue};
use catalog_core::ProductId;
use tracing::{info, warn};

use crate::form_file::FormFile;

/// Save a product described by a form file.
///
/// # Errors
///
/// Returns an error if loading fails or any save step fails. The error's
/// user message is logged before returning.
pub async fn save(
    path: &Path,
    product: Option<ProductId>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let catalogue = load_catalogue(config.option_catalogue.as_deref()).await?;
    let file = FormFile::load(path).await?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let media = file.media_files(base_dir).await?;

    let outcome = if dry_run {
        info!("Dry run: using in-memory storage");
        let store = InMemoryCatalogStore::new();
        let storage = InMemoryStorage::default();
        let form = ProductForm::new(&catalogue, &config);
        fill_and_save(form, &file, &media, &store, Some(&storage)).await
    } else {
        let pool = db::create_pool(config.database_url()?).await?;
        let store = PgCatalogStore::new(pool);
        let form = match product {
            Some(id) => ProductForm::edit(&catalogue, &config, &store.load_product(id).await?),
            None => ProductForm::new(&catalogue, &config),
        };
        let storage = if media.is_empty() {
            None
        } else {
            Some(HttpObjectStorage::new(config.storage()?)?)
        };
        fill_and_save(form, &file, &media, &store, storage.as_ref()).await
    };

    match outcome {
        Ok(outcome) => {
            info!(
                product_id = %outcome.product_id,
                redirect = outcome.redirect,
                "{}",
                outcome.message
            );
            #[allow(clippy::print_stdout)]
            {
                println!("{}", outcome.message);
                println!("  Product ID: {}", outcome.product_id);
                println!(
                    "  Variants: {} inserted, {} updated, {} deleted",
                    outcome.variants.inserted, outcome.variants.updated, outcome.variants.deleted
                );
            }
            Ok(())
        }
        Err(e) => {
            warn!("{}", e.user_message());
            Err(e.into())
        }
    }
}

/// Apply a form file to `form`, upload its media and save.
async fn fill_and_save<S, O>(
    mut form: ProductForm,
    file: &FormFile,
    media: &[UploadFile],
    store: &S,
    storage: Option<&O>,
) -> Result<SaveOutcome, AppError>
where
    S: ProductStore + CategorySource,
    O: ObjectStorage,
{
    file.apply(&mut form)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    form.load_categories(store).await?;

    if !media.is_empty() {
        let storage = storage.ok_or_else(|| {
            AppError::BadRequest("media uploads need CATALOG_STORAGE_URL".to_string())
        })?;
        for upload in media {
            form.upload_media(storage, upload).await?;
        }
    }

    form.save(store).await
}

/// Print a stored product as JSON.
///
/// # Errors
///
/// Returns an error if the product cannot be loaded.
pub async fn show(id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let store = PgCatalogStore::new(db::create_pool(config.database_url()?).await?);
    let product = store.load_product(id).await.map_err(AppError::from)?;

    let json = serde_json::to_string_pretty(&product)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}

/// List active categories.
///
/// # Errors
///
/// Returns an error if the categories cannot be loaded.
pub async fn categories() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let store = PgCatalogStore::new(db::create_pool(config.database_url()?).await?);
    let categories = store.active_categories().await?;

    #[allow(clippy::print_stdout)]
    {
        for category in &categories {
            println!("{:>6}  {}", category.id, category.name);
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use catalog_admin::db::StoreOperation;
    use catalog_admin::default_catalogue;
    use catalog_core::{Category, CategoryId};

    #[tokio::test]
    async fn test_fill_and_save_uploads_then_saves() {
        let file = FormFile::parse(
            r#"
product:
  name: Loose Wave
base_price: "80"
options:
  - group: length
    values: ['18"']
"#,
        )
        .unwrap();
        let store = InMemoryCatalogStore::with_categories(vec![Category {
            id: CategoryId::new(2),
            name: "Wigs".to_string(),
        }]);
        let storage = InMemoryStorage::default();
        let media = vec![UploadFile::new("a.png", "image/png", vec![1])];
        let form = ProductForm::new(&default_catalogue().unwrap(), &AdminConfig::default());

        let outcome = fill_and_save(form, &file, &media, &store, Some(&storage))
            .await
            .unwrap();

        let record = store.product(outcome.product_id).unwrap();
        assert_eq!(record.slug, "loose-wave");
        assert_eq!(record.category_id, Some(CategoryId::new(2)));
        assert_eq!(store.images(outcome.product_id).len(), 1);
        assert_eq!(store.variants(outcome.product_id).len(), 1);
        assert_eq!(storage.paths().len(), 1);
    }

    #[tokio::test]
    async fn test_fill_and_save_requires_storage_for_media() {
        let store = InMemoryCatalogStore::new();
        let media = vec![UploadFile::new("a.png", "image/png", vec![1])];
        let form = ProductForm::new(&default_catalogue().unwrap(), &AdminConfig::default());

        let err = fill_and_save(
            form,
            &FormFile::default(),
            &media,
            &store,
            None::<&InMemoryStorage>,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(!store.calls().contains(&StoreOperation::CreateProduct));
    }
}
