//! In-memory catalog store for tests and dry runs.
//!
//! Behaves like [`PgCatalogStore`](super::PgCatalogStore): slugs are unique,
//! variant change sets apply atomically and IDs are never reused. Individual
//! operations can be made to fail to exercise error paths.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use catalog_core::{
    Category, ImageRecord, ProductId, ProductRecord, StoredProduct, StoredVariant,
    VariantChangeSet, VariantId,
};

use super::{CategorySource, ProductStore, RepositoryError};

/// Store operations, for failure injection and call recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    ActiveCategories,
    CreateProduct,
    UpdateProduct,
    ReplaceImages,
    ListVariants,
    ApplyVariantChanges,
    LoadProduct,
}

#[derive(Debug, Default)]
struct State {
    last_id: i32,
    categories: Vec<Category>,
    products: BTreeMap<ProductId, ProductRecord>,
    images: BTreeMap<ProductId, Vec<ImageRecord>>,
    variants: BTreeMap<ProductId, Vec<StoredVariant>>,
    failures: HashSet<StoreOperation>,
    calls: Vec<StoreOperation>,
}

impl State {
    const fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn begin(&mut self, op: StoreOperation) -> Result<(), RepositoryError> {
        self.calls.push(op);
        if self.failures.contains(&op) {
            return Err(RepositoryError::Database(sqlx::Error::Protocol(format!(
                "injected failure in {op:?}"
            ))));
        }
        Ok(())
    }

    fn slug_taken(&self, slug: &str, except: Option<ProductId>) -> bool {
        self.products
            .iter()
            .any(|(id, record)| Some(*id) != except && record.slug == slug)
    }
}

/// Catalog store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    state: Mutex<State>,
}

impl InMemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store offering `categories` as the active categories.
    #[must_use]
    pub fn with_categories(categories: Vec<Category>) -> Self {
        let store = Self::new();
        store.lock().categories = categories;
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every later call of `op` fail.
    pub fn fail_on(&self, op: StoreOperation) {
        self.lock().failures.insert(op);
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Operations called so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreOperation> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<ProductRecord> {
        self.lock().products.get(&id).cloned()
    }

    #[must_use]
    pub fn images(&self, id: ProductId) -> Vec<ImageRecord> {
        self.lock().images.get(&id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn variants(&self, id: ProductId) -> Vec<StoredVariant> {
        self.lock().variants.get(&id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        self.lock().products.len()
    }
}

impl CategorySource for InMemoryCatalogStore {
    async fn active_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut state = self.lock();
        state.begin(StoreOperation::ActiveCategories)?;
        Ok(state.categories.clone())
    }
}

impl ProductStore for InMemoryCatalogStore {
    async fn create_product(&self, record: &ProductRecord) -> Result<ProductId, RepositoryError> {
        let mut state = self.lock();
        state.begin(StoreOperation::CreateProduct)?;
        if state.slug_taken(&record.slug, None) {
            return Err(RepositoryError::Conflict("slug already exists".to_string()));
        }

        let id = ProductId::new(state.next_id());
        state.products.insert(id, record.clone());
        Ok(id)
    }

    async fn update_product(
        &self,
        id: ProductId,
        record: &ProductRecord,
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        state.begin(StoreOperation::UpdateProduct)?;
        if !state.products.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if state.slug_taken(&record.slug, Some(id)) {
            return Err(RepositoryError::Conflict("slug already exists".to_string()));
        }

        state.products.insert(id, record.clone());
        Ok(())
    }

    async fn replace_images(
        &self,
        id: ProductId,
        images: &[ImageRecord],
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        state.begin(StoreOperation::ReplaceImages)?;
        if !state.products.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }

        state.images.insert(id, images.to_vec());
        Ok(())
    }

    async fn list_variants(&self, id: ProductId) -> Result<Vec<StoredVariant>, RepositoryError> {
        let mut state = self.lock();
        state.begin(StoreOperation::ListVariants)?;
        let mut variants = state.variants.get(&id).cloned().unwrap_or_default();
        variants.sort_by_key(|v| (v.record.position, v.id));
        Ok(variants)
    }

    async fn apply_variant_changes(
        &self,
        id: ProductId,
        changes: &VariantChangeSet,
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        state.begin(StoreOperation::ApplyVariantChanges)?;
        if !state.products.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }

        let mut rows = state.variants.get(&id).cloned().unwrap_or_default();
        rows.retain(|row| !changes.deletes.contains(&row.id));
        for update in &changes.updates {
            if let Some(row) = rows.iter_mut().find(|row| row.id == update.id) {
                row.record = update.record.clone();
            }
        }
        for record in &changes.inserts {
            let variant_id = VariantId::new(state.next_id());
            rows.push(StoredVariant {
                id: variant_id,
                record: record.clone(),
            });
        }

        state.variants.insert(id, rows);
        Ok(())
    }

    async fn load_product(&self, id: ProductId) -> Result<StoredProduct, RepositoryError> {
        let mut state = self.lock();
        state.begin(StoreOperation::LoadProduct)?;
        let record = state
            .products
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;
        let mut variants = state.variants.get(&id).cloned().unwrap_or_default();
        variants.sort_by_key(|v| (v.record.position, v.id));

        Ok(StoredProduct {
            id,
            record,
            images: state.images.get(&id).cloned().unwrap_or_default(),
            variants,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use catalog_core::{CategoryId, ProductDraft, ProductOptions, SkuGenerator, VariantRecord};
    use rust_decimal::Decimal;

    fn record(slug: &str) -> ProductRecord {
        let draft = ProductDraft {
            name: "Body Wave".to_string(),
            slug: slug.to_string(),
            sku: "SKU-1".to_string(),
            ..ProductDraft::default()
        };
        let options = ProductOptions::new(&catalog_core::OptionCatalogue::default());
        draft.build(&options, &SkuGenerator::default()).unwrap().0
    }

    fn variant(position: i32, value: &str) -> VariantRecord {
        VariantRecord {
            position,
            name: value.to_string(),
            option_values: vec![value.to_string()],
            price: Decimal::ONE,
            stock: 1,
            sku: None,
        }
    }

    #[tokio::test]
    async fn test_slug_conflict() {
        let store = InMemoryCatalogStore::new();
        store.create_product(&record("body-wave")).await.unwrap();
        let result = store.create_product(&record("body-wave")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let store = InMemoryCatalogStore::new();
        let result = store
            .update_product(ProductId::new(99), &record("body-wave"))
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_apply_variant_changes() {
        let store = InMemoryCatalogStore::new();
        let id = store.create_product(&record("body-wave")).await.unwrap();
        let changes = VariantChangeSet {
            inserts: vec![variant(0, "10\""), variant(1, "12\"")],
            ..VariantChangeSet::default()
        };
        store.apply_variant_changes(id, &changes).await.unwrap();

        let stored = store.list_variants(id).await.unwrap();
        assert_eq!(stored.len(), 2);
        let first = stored[0].id;

        let changes = VariantChangeSet {
            deletes: vec![stored[1].id],
            updates: vec![StoredVariant {
                id: first,
                record: VariantRecord {
                    stock: 9,
                    ..variant(0, "10\"")
                },
            }],
            ..VariantChangeSet::default()
        };
        store.apply_variant_changes(id, &changes).await.unwrap();

        let stored = store.list_variants(id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, first);
        assert_eq!(stored[0].record.stock, 9);
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let store = InMemoryCatalogStore::with_categories(vec![Category {
            id: CategoryId::new(1),
            name: "Wigs".to_string(),
        }]);
        store.fail_on(StoreOperation::ActiveCategories);
        assert!(store.active_categories().await.is_err());

        store.clear_failures();
        assert_eq!(store.active_categories().await.unwrap().len(), 1);
        assert_eq!(
            store.calls(),
            vec![StoreOperation::ActiveCategories, StoreOperation::ActiveCategories]
        );
    }
}
