//! Catalog storage.
//!
//! # Tables (schema `catalog`)
//!
//! - `categories` - Product categories (only `active` ones are offered)
//! - `products` - Product listings, options metadata in a JSONB column
//! - `product_images` - Ordered product media
//! - `product_variants` - One row per option combination, up to three option columns
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p catalog-cli -- migrate
//! ```

pub mod memory;
pub mod products;

use std::time::Duration;

use catalog_core::{
    Category, ImageRecord, ProductId, ProductRecord, StoredProduct, StoredVariant,
    VariantChangeSet,
};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::{InMemoryCatalogStore, StoreOperation};
pub use products::PgCatalogStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Source of the categories a product can be filed under.
#[allow(async_fn_in_trait)]
pub trait CategorySource {
    /// Active categories, in display order.
    async fn active_categories(&self) -> Result<Vec<Category>, RepositoryError>;
}

/// Persistence for products, their media and their variant rows.
#[allow(async_fn_in_trait)]
pub trait ProductStore {
    /// Insert a new product and return its ID.
    async fn create_product(&self, record: &ProductRecord) -> Result<ProductId, RepositoryError>;

    /// Overwrite an existing product's fields.
    async fn update_product(
        &self,
        id: ProductId,
        record: &ProductRecord,
    ) -> Result<(), RepositoryError>;

    /// Replace all media rows of a product.
    async fn replace_images(
        &self,
        id: ProductId,
        images: &[ImageRecord],
    ) -> Result<(), RepositoryError>;

    /// Stored variant rows of a product, in position order.
    async fn list_variants(&self, id: ProductId) -> Result<Vec<StoredVariant>, RepositoryError>;

    /// Apply a variant change set as one unit.
    async fn apply_variant_changes(
        &self,
        id: ProductId,
        changes: &VariantChangeSet,
    ) -> Result<(), RepositoryError>;

    /// Load a product with its media and variant rows.
    async fn load_product(&self, id: ProductId) -> Result<StoredProduct, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map unique violations to `Conflict`, everything else to `Database`.
fn conflict_or_database(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
