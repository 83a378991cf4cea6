//! `PostgreSQL` catalog store.
//!
//! Queries are built at runtime (`sqlx::query`/`query_as`) so the crate
//! compiles without a live database.

use catalog_core::{
    Category, CategoryId, ImageRecord, ProductId, ProductMetadata, ProductRecord, ProductStatus,
    StoredProduct, StoredVariant, VariantChangeSet, VariantId, VariantRecord,
    variants::MAX_OPTION_COLUMNS,
};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use super::{CategorySource, ProductStore, RepositoryError, conflict_or_database};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    description: String,
    category_id: Option<i32>,
    price: Decimal,
    compare_at_price: Option<Decimal>,
    sku: String,
    quantity: i64,
    moq: i32,
    status: String,
    featured: bool,
    seo_title: String,
    seo_description: String,
    tags: Vec<String>,
    metadata: serde_json::Value,
}

impl ProductRow {
    fn into_record(self) -> Result<(ProductId, ProductRecord), RepositoryError> {
        let status: ProductStatus = self
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("product {}: {e}", self.id)))?;
        let metadata: ProductMetadata = serde_json::from_value(self.metadata).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid metadata on product {}: {e}", self.id))
        })?;

        Ok((
            ProductId::new(self.id),
            ProductRecord {
                name: self.name,
                slug: self.slug,
                description: self.description,
                category_id: self.category_id.map(CategoryId::new),
                price: self.price,
                compare_at_price: self.compare_at_price,
                sku: self.sku,
                quantity: self.quantity,
                moq: self.moq,
                status,
                featured: self.featured,
                seo_title: self.seo_title,
                seo_description: self.seo_description,
                tags: self.tags,
                metadata,
            },
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    url: String,
    position: i32,
    alt_text: String,
}

impl From<ImageRow> for ImageRecord {
    fn from(row: ImageRow) -> Self {
        Self {
            url: row.url,
            position: row.position,
            alt_text: row.alt_text,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: i32,
    position: i32,
    name: String,
    sku: Option<String>,
    price: Decimal,
    quantity: i64,
    option1: Option<String>,
    option2: Option<String>,
    option3: Option<String>,
}

impl From<VariantRow> for StoredVariant {
    fn from(row: VariantRow) -> Self {
        let option_values = [row.option1, row.option2, row.option3]
            .into_iter()
            .map_while(|value| value.filter(|v| !v.is_empty()))
            .collect();

        Self {
            id: VariantId::new(row.id),
            record: VariantRecord {
                position: row.position,
                name: row.name,
                option_values,
                price: row.price,
                stock: row.quantity,
                sku: row.sku,
            },
        }
    }
}

/// Option columns of a record, padded with `None`.
fn option_columns(record: &VariantRecord) -> [Option<&str>; MAX_OPTION_COLUMNS] {
    [record.option(0), record.option(1), record.option(2)]
}

const PRODUCT_COLUMNS: &str = "id, name, slug, description, category_id, price, compare_at_price, \
     sku, quantity, moq, status, featured, seo_title, seo_description, tags, metadata";

const VARIANT_COLUMNS: &str = "id, position, name, sku, price, quantity, option1, option2, option3";

// =============================================================================
// Store
// =============================================================================

/// Catalog store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_variant(
        tx: &mut Transaction<'_, Postgres>,
        id: ProductId,
        record: &VariantRecord,
    ) -> Result<(), sqlx::Error> {
        let [option1, option2, option3] = option_columns(record);
        sqlx::query(
            r"
            INSERT INTO catalog.product_variants
                (product_id, position, name, sku, price, quantity, option1, option2, option3)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(id)
        .bind(record.position)
        .bind(&record.name)
        .bind(record.sku.as_deref())
        .bind(record.price)
        .bind(record.stock)
        .bind(option1)
        .bind(option2)
        .bind(option3)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn update_variant(
        tx: &mut Transaction<'_, Postgres>,
        id: ProductId,
        variant: &StoredVariant,
    ) -> Result<(), sqlx::Error> {
        let record = &variant.record;
        let [option1, option2, option3] = option_columns(record);
        sqlx::query(
            r"
            UPDATE catalog.product_variants
            SET position = $3, name = $4, sku = $5, price = $6, quantity = $7,
                option1 = $8, option2 = $9, option3 = $10, updated_at = NOW()
            WHERE id = $1 AND product_id = $2
            ",
        )
        .bind(variant.id)
        .bind(id)
        .bind(record.position)
        .bind(&record.name)
        .bind(record.sku.as_deref())
        .bind(record.price)
        .bind(record.stock)
        .bind(option1)
        .bind(option2)
        .bind(option3)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

impl CategorySource for PgCatalogStore {
    #[instrument(skip(self))]
    async fn active_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r"
            SELECT id, name FROM catalog.categories
            WHERE status = 'active'
            ORDER BY name, id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}

impl ProductStore for PgCatalogStore {
    #[instrument(skip(self, record), fields(slug = %record.slug))]
    async fn create_product(&self, record: &ProductRecord) -> Result<ProductId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO catalog.products
                (name, slug, description, category_id, price, compare_at_price, sku, quantity,
                 moq, status, featured, seo_title, seo_description, tags, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id
            ",
        )
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.description)
        .bind(record.category_id)
        .bind(record.price)
        .bind(record.compare_at_price)
        .bind(&record.sku)
        .bind(record.quantity)
        .bind(record.moq)
        .bind(record.status.as_str())
        .bind(record.featured)
        .bind(&record.seo_title)
        .bind(&record.seo_description)
        .bind(&record.tags)
        .bind(Json(&record.metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "slug"))?;

        Ok(ProductId::new(id))
    }

    #[instrument(skip(self, record), fields(slug = %record.slug))]
    async fn update_product(
        &self,
        id: ProductId,
        record: &ProductRecord,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE catalog.products
            SET name = $2, slug = $3, description = $4, category_id = $5, price = $6,
                compare_at_price = $7, sku = $8, quantity = $9, moq = $10, status = $11,
                featured = $12, seo_title = $13, seo_description = $14, tags = $15,
                metadata = $16, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.description)
        .bind(record.category_id)
        .bind(record.price)
        .bind(record.compare_at_price)
        .bind(&record.sku)
        .bind(record.quantity)
        .bind(record.moq)
        .bind(record.status.as_str())
        .bind(record.featured)
        .bind(&record.seo_title)
        .bind(&record.seo_description)
        .bind(&record.tags)
        .bind(Json(&record.metadata))
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "slug"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, images), fields(count = images.len()))]
    async fn replace_images(
        &self,
        id: ProductId,
        images: &[ImageRecord],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM catalog.product_images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for image in images {
            sqlx::query(
                r"
                INSERT INTO catalog.product_images (product_id, url, position, alt_text)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(id)
            .bind(&image.url)
            .bind(image.position)
            .bind(&image.alt_text)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_variants(&self, id: ProductId) -> Result<Vec<StoredVariant>, RepositoryError> {
        let rows: Vec<VariantRow> = sqlx::query_as(&format!(
            "SELECT {VARIANT_COLUMNS} FROM catalog.product_variants \
             WHERE product_id = $1 ORDER BY position, id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredVariant::from).collect())
    }

    #[instrument(
        skip(self, changes),
        fields(
            inserts = changes.inserts.len(),
            updates = changes.updates.len(),
            deletes = changes.deletes.len(),
        )
    )]
    async fn apply_variant_changes(
        &self,
        id: ProductId,
        changes: &VariantChangeSet,
    ) -> Result<(), RepositoryError> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        if !changes.deletes.is_empty() {
            let ids: Vec<i32> = changes.deletes.iter().map(VariantId::as_i32).collect();
            sqlx::query(
                "DELETE FROM catalog.product_variants WHERE product_id = $1 AND id = ANY($2)",
            )
            .bind(id)
            .bind(&ids)
            .execute(&mut *tx)
            .await?;
        }

        for variant in &changes.updates {
            Self::update_variant(&mut tx, id, variant).await?;
        }

        for record in &changes.inserts {
            Self::insert_variant(&mut tx, id, record).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_product(&self, id: ProductId) -> Result<StoredProduct, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let (id, record) = row.ok_or(RepositoryError::NotFound)?.into_record()?;

        let images: Vec<ImageRow> = sqlx::query_as(
            r"
            SELECT url, position, alt_text FROM catalog.product_images
            WHERE product_id = $1
            ORDER BY position, id
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let variants = self.list_variants(id).await?;

        Ok(StoredProduct {
            id,
            record,
            images: images.into_iter().map(ImageRecord::from).collect(),
            variants,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(options: [Option<&str>; 3]) -> VariantRow {
        let [option1, option2, option3] = options.map(|o| o.map(ToString::to_string));
        VariantRow {
            id: 9,
            position: 2,
            name: "Red / 12\"".to_string(),
            sku: None,
            price: Decimal::new(2500, 2),
            quantity: 4,
            option1,
            option2,
            option3,
        }
    }

    #[test]
    fn test_variant_row_options_stop_at_first_gap() {
        let stored = StoredVariant::from(row([Some("Red"), Some("12\""), None]));
        assert_eq!(stored.id, VariantId::new(9));
        assert_eq!(stored.record.option_values, vec!["Red", "12\""]);
        assert_eq!(stored.record.stock, 4);

        let gapped = StoredVariant::from(row([Some("Red"), None, Some("Large")]));
        assert_eq!(gapped.record.option_values, vec!["Red"]);
    }

    #[test]
    fn test_option_columns_pad_with_none() {
        let record = StoredVariant::from(row([Some("Red"), None, None])).record;
        assert_eq!(option_columns(&record), [Some("Red"), None, None]);
    }

    #[test]
    fn test_product_row_rejects_bad_status() {
        let row = ProductRow {
            id: 1,
            name: "Wig".to_string(),
            slug: "wig".to_string(),
            description: String::new(),
            category_id: None,
            price: Decimal::ZERO,
            compare_at_price: None,
            sku: "SKU-1".to_string(),
            quantity: 0,
            moq: 1,
            status: "deleted".to_string(),
            featured: false,
            seo_title: String::new(),
            seo_description: String::new(),
            tags: Vec::new(),
            metadata: serde_json::json!({}),
        };
        let result = row.into_record();
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_product_row_accepts_empty_metadata() {
        let row = ProductRow {
            id: 3,
            name: "Wig".to_string(),
            slug: "wig".to_string(),
            description: String::new(),
            category_id: Some(4),
            price: Decimal::new(9900, 2),
            compare_at_price: None,
            sku: "SKU-1".to_string(),
            quantity: 12,
            moq: 1,
            status: "draft".to_string(),
            featured: true,
            seo_title: String::new(),
            seo_description: String::new(),
            tags: vec!["wig".to_string()],
            metadata: serde_json::json!({}),
        };
        let (id, record) = row.into_record().unwrap();
        assert_eq!(id, ProductId::new(3));
        assert_eq!(record.status, ProductStatus::Draft);
        assert_eq!(record.category_id, Some(CategoryId::new(4)));
        assert_eq!(record.metadata.low_stock_threshold, 5);
        assert!(record.metadata.options.option_names.is_empty());
    }
}
