//! Product form session.
//!
//! A [`ProductForm`] holds everything the product editor shows while it is
//! open: the free-text fields, the option groups with their variant
//! overrides, the media list and the category choices. Nothing is written
//! until [`ProductForm::save`]:
//! 1. Build the product record (slug/SKU fallbacks, quantity sync, metadata)
//! 2. Insert or update the product
//! 3. Replace its media rows
//! 4. Reconcile its variant rows against the current combinations
//!
//! The steps run in order and stop at the first failure.

use catalog_core::{
    Category, ImageRecord, MediaItem, MediaKind, OptionCatalogue, ProductDraft, ProductId,
    ProductOptions, SkuGenerator, StoredProduct, VariantChangeSet, VariantRecord, reconcile,
    slugify, storage_file_name,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::db::{CategorySource, ProductStore};
use crate::error::AppError;
use crate::storage::{ObjectStorage, UploadFile};

/// Where the editor goes after a successful save.
pub const PRODUCTS_PATH: &str = "/admin/products";

/// Whether the form creates a new product or edits a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProductId),
}

/// Variant row writes made by a save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantWrites {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl From<&VariantChangeSet> for VariantWrites {
    fn from(changes: &VariantChangeSet) -> Self {
        Self {
            inserted: changes.inserts.len(),
            updated: changes.updates.len(),
            deleted: changes.deletes.len(),
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub product_id: ProductId,
    /// Whether the save created the product.
    pub created: bool,
    /// Confirmation shown to the user.
    pub message: String,
    /// Path to navigate to.
    pub redirect: &'static str,
    pub variants: VariantWrites,
}

/// An open product editor.
#[derive(Debug, Clone)]
pub struct ProductForm {
    mode: FormMode,
    draft: ProductDraft,
    options: ProductOptions,
    media: Vec<MediaItem>,
    categories: Option<Vec<Category>>,
    skus: SkuGenerator,
}

impl ProductForm {
    /// Open an empty form for a new product, with a generated SKU.
    #[must_use]
    pub fn new(catalogue: &OptionCatalogue, config: &AdminConfig) -> Self {
        let skus = SkuGenerator::new(&config.sku_prefix);
        let draft = ProductDraft {
            sku: skus.generate(),
            ..ProductDraft::default()
        };

        Self {
            mode: FormMode::Create,
            draft,
            options: ProductOptions::new(catalogue),
            media: Vec::new(),
            categories: None,
            skus,
        }
    }

    /// Open a stored product for editing.
    ///
    /// Options and overrides are rebuilt from the product metadata and its
    /// stored variant rows.
    #[must_use]
    pub fn edit(
        catalogue: &OptionCatalogue,
        config: &AdminConfig,
        product: &StoredProduct,
    ) -> Self {
        let rows: Vec<VariantRecord> = product
            .variants
            .iter()
            .map(|variant| variant.record.clone())
            .collect();
        let options = ProductOptions::restore(
            catalogue,
            &product.record.metadata.options,
            &rows,
            product.record.price.to_string(),
        );

        Self {
            mode: FormMode::Edit(product.id),
            draft: ProductDraft::from_record(&product.record),
            options,
            media: product.media(),
            categories: None,
            skus: SkuGenerator::new(&config.sku_prefix),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub const fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    #[must_use]
    pub const fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub const fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    #[must_use]
    pub const fn options(&self) -> &ProductOptions {
        &self.options
    }

    pub const fn options_mut(&mut self) -> &mut ProductOptions {
        &mut self.options
    }

    /// Media in display order.
    #[must_use]
    pub fn media(&self) -> &[MediaItem] {
        &self.media
    }

    /// Categories loaded so far (empty until [`load_categories`](Self::load_categories)).
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        self.categories.as_deref().unwrap_or_default()
    }

    /// Set the product name.
    ///
    /// New products get a slug derived from the name while the slug is blank.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
        if !self.is_edit() && self.draft.slug.trim().is_empty() {
            self.draft.slug = slugify(&self.draft.name);
        }
    }

    /// Fetch the active categories once and preselect the first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the categories cannot be fetched.
    #[instrument(skip_all)]
    pub async fn load_categories<S: CategorySource>(
        &mut self,
        source: &S,
    ) -> Result<&[Category], AppError> {
        if self.categories.is_none() {
            let categories = source.active_categories().await.map_err(|e| {
                error!(error = %e, "Failed to load categories");
                AppError::from(e)
            })?;
            debug!(count = categories.len(), "Loaded categories");
            self.categories = Some(categories);
        }

        let categories = self.categories.as_deref().unwrap_or_default();
        if self.draft.category_id.is_none()
            && let Some(first) = categories.first()
        {
            self.draft.category_id = Some(first.id);
        }
        Ok(categories)
    }

    /// Upload a file and append it to the media list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for files that are neither images nor
    /// accepted videos, and `AppError::Storage` if the upload fails.
    #[instrument(skip_all, fields(file = %file.file_name, content_type = %file.content_type))]
    pub async fn upload_media<S: ObjectStorage>(
        &mut self,
        storage: &S,
        file: &UploadFile,
    ) -> Result<&MediaItem, AppError> {
        let kind = file.kind().ok_or_else(|| {
            AppError::BadRequest(format!("unsupported file type: {}", file.content_type))
        })?;

        let path = storage_file_name(&file.file_name, &Uuid::new_v4().simple().to_string());
        let url = storage.upload(&path, file).await.map_err(|e| {
            error!(error = %e, "Failed to upload media");
            AppError::from(e)
        })?;

        let position = i32::try_from(self.media.len()).unwrap_or(i32::MAX);
        self.media.push(MediaItem {
            url,
            position,
            is_video: kind == MediaKind::Video,
        });
        info!(position, "Added media");

        self.media
            .last()
            .ok_or_else(|| AppError::Internal("media list empty after upload".to_string()))
    }

    /// Remove the media item at `index`; later items move up.
    pub fn remove_media(&mut self, index: usize) -> Option<MediaItem> {
        if index >= self.media.len() {
            return None;
        }
        let removed = self.media.remove(index);
        for (item, position) in self.media.iter_mut().zip(0..) {
            item.position = position;
        }
        Some(removed)
    }

    /// Save the product, its media and its variants.
    ///
    /// After creating a product the form switches to editing it, so a second
    /// save updates the same row.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; earlier steps stay applied.
    #[instrument(skip_all, fields(mode = ?self.mode))]
    pub async fn save<S: ProductStore>(&mut self, store: &S) -> Result<SaveOutcome, AppError> {
        let result = self.persist(store).await;
        if let Err(e) = &result {
            if e.is_server_error() {
                error!(error = %e, "Error saving product");
            } else {
                info!(error = %e, "Product save rejected");
            }
        }
        result
    }

    async fn persist<S: ProductStore>(&mut self, store: &S) -> Result<SaveOutcome, AppError> {
        let (record, variants) = self.draft.build(&self.options, &self.skus)?;

        let (product_id, created) = match self.mode {
            FormMode::Edit(id) => {
                store.update_product(id, &record).await?;
                (id, false)
            }
            FormMode::Create => (store.create_product(&record).await?, true),
        };

        let images = ImageRecord::from_media(&self.media, &record.name);
        store.replace_images(product_id, &images).await?;

        let existing = if created {
            Vec::new()
        } else {
            store.list_variants(product_id).await?
        };
        let changes = reconcile(&existing, &variants);
        store.apply_variant_changes(product_id, &changes).await?;

        self.mode = FormMode::Edit(product_id);
        self.draft.slug.clone_from(&record.slug);
        self.draft.sku.clone_from(&record.sku);

        let writes = VariantWrites::from(&changes);
        info!(
            product_id = %product_id,
            created,
            quantity = record.quantity,
            inserted = writes.inserted,
            updated = writes.updated,
            deleted = writes.deleted,
            "Saved product"
        );

        Ok(SaveOutcome {
            product_id,
            created,
            message: if created {
                "Product created successfully!".to_string()
            } else {
                "Product updated successfully!".to_string()
            },
            redirect: PRODUCTS_PATH,
            variants: writes,
        })
    }
}
