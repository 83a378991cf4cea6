//! Integration tests for saving products through the product form.
//!
//! Every test runs a full save against the in-memory store and storage.

#![allow(clippy::unwrap_used)]

use catalog_admin::db::{InMemoryCatalogStore, ProductStore, StoreOperation};
use catalog_admin::storage::{InMemoryStorage, UploadFile};
use catalog_admin::{AdminConfig, AppError, FormMode, ProductForm, default_catalogue};
use catalog_core::{Category, CategoryId, GroupKey, VariantField, VariantKey};
use rust_decimal::Decimal;

fn new_form() -> ProductForm {
    ProductForm::new(&default_catalogue().unwrap(), &AdminConfig::default())
}

fn key(value: &str) -> VariantKey {
    VariantKey::new(vec![value.to_string()])
}

/// A form with a "Texture" group generating two variants.
fn textured_form(name: &str) -> ProductForm {
    let mut form = new_form();
    form.set_name(name);
    let options = form.options_mut();
    options.set_base_price("120");
    options.create_group("Texture");
    let texture = GroupKey::custom("Texture");
    options.add_value(&texture, "Straight").unwrap();
    options.add_value(&texture, "Wavy").unwrap();
    options.set_participates_in_variants(&texture, true).unwrap();
    options.set_field(key("Straight"), VariantField::Stock, "3");
    options.set_field(key("Wavy"), VariantField::Stock, "4");
    form
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_syncs_quantity_with_variants() {
    let store = InMemoryCatalogStore::new();
    let mut form = textured_form("Body Wave Wig");

    let outcome = form.save(&store).await.unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.message, "Product created successfully!");
    assert_eq!(outcome.redirect, "/admin/products");
    assert_eq!(outcome.variants.inserted, 2);

    let record = store.product(outcome.product_id).unwrap();
    assert_eq!(record.slug, "body-wave-wig");
    assert_eq!(record.quantity, 7);
    assert_eq!(record.price, Decimal::from(120));
    assert!(record.sku.starts_with("SKU-"));

    let variants = store.variants(outcome.product_id);
    let names: Vec<_> = variants.iter().map(|v| v.record.name.as_str()).collect();
    assert_eq!(names, ["Straight", "Wavy"]);
    assert_eq!(variants.iter().map(|v| v.record.stock).sum::<i64>(), 7);
    assert!(variants.iter().all(|v| v.record.price == Decimal::from(120)));
}

#[tokio::test]
async fn test_create_without_variants_uses_form_stock() {
    let store = InMemoryCatalogStore::new();
    let mut form = new_form();
    form.set_name("Edge Brush");
    form.draft_mut().stock = "12".to_string();
    form.options_mut().set_base_price("9.5");

    let outcome = form.save(&store).await.unwrap();

    let record = store.product(outcome.product_id).unwrap();
    assert_eq!(record.quantity, 12);
    assert_eq!(record.price, Decimal::new(95, 1));
    assert!(store.variants(outcome.product_id).is_empty());
}

#[tokio::test]
async fn test_create_selects_first_category_and_stores_media() {
    let store = InMemoryCatalogStore::with_categories(vec![
        Category {
            id: CategoryId::new(4),
            name: "Wigs".to_string(),
        },
        Category {
            id: CategoryId::new(9),
            name: "Bundles".to_string(),
        },
    ]);
    let storage = InMemoryStorage::default();
    let mut form = textured_form("Kinky Straight");

    form.load_categories(&store).await.unwrap();
    form.upload_media(&storage, &UploadFile::new("front.jpg", "image/jpeg", vec![1, 2]))
        .await
        .unwrap();
    form.upload_media(&storage, &UploadFile::new("spin.mp4", "video/mp4", vec![3]))
        .await
        .unwrap();
    let outcome = form.save(&store).await.unwrap();

    let record = store.product(outcome.product_id).unwrap();
    assert_eq!(record.category_id, Some(CategoryId::new(4)));

    let images = store.images(outcome.product_id);
    assert_eq!(images.len(), 2);
    assert_eq!(images.first().unwrap().position, 0);
    assert_eq!(images.get(1).unwrap().position, 1);
    assert!(images.iter().all(|image| image.alt_text == "Kinky Straight"));
    assert!(images.iter().all(|image| image.url.starts_with("memory://products/")));
    assert_eq!(storage.paths().len(), 2);
}

#[tokio::test]
async fn test_rejected_upload_keeps_media_list() {
    let storage = InMemoryStorage::default();
    let mut form = new_form();

    let err = form
        .upload_media(&storage, &UploadFile::new("notes.pdf", "application/pdf", vec![1]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(form.media().is_empty());
    assert!(storage.paths().is_empty());
}

#[tokio::test]
async fn test_second_save_updates_the_created_product() {
    let store = InMemoryCatalogStore::new();
    let mut form = textured_form("Loose Deep");

    let first = form.save(&store).await.unwrap();
    assert_eq!(form.mode(), FormMode::Edit(first.product_id));

    form.draft_mut().description = "Soft and full".to_string();
    let second = form.save(&store).await.unwrap();

    assert!(!second.created);
    assert_eq!(second.product_id, first.product_id);
    assert_eq!(second.message, "Product updated successfully!");
    assert_eq!(store.product_count(), 1);
    assert_eq!(second.variants.inserted, 0);
    assert_eq!(second.variants.deleted, 0);
}

// =============================================================================
// Edit
// =============================================================================

#[tokio::test]
async fn test_edit_round_trip_restores_the_form() {
    let store = InMemoryCatalogStore::new();
    let mut form = textured_form("Water Wave");
    form.options_mut()
        .set_field(key("Wavy"), VariantField::Price, "135.00");
    let outcome = form.save(&store).await.unwrap();

    let stored = store.load_product(outcome.product_id).await.unwrap();
    let edit = ProductForm::edit(&default_catalogue().unwrap(), &AdminConfig::default(), &stored);

    assert_eq!(edit.mode(), FormMode::Edit(outcome.product_id));
    assert_eq!(edit.draft().name, "Water Wave");
    assert_eq!(edit.draft().sku, form.draft().sku);
    assert_eq!(edit.options().combinations(), form.options().combinations());
    assert_eq!(edit.options().total_stock(), 7);
    assert_eq!(
        edit.options().get_override(&key("Wavy")).price.as_deref(),
        Some("135.00")
    );
}

#[tokio::test]
async fn test_edit_reconciles_variant_rows() {
    let store = InMemoryCatalogStore::new();
    let mut form = textured_form("Jerry Curl");
    let created = form.save(&store).await.unwrap();
    let before = store.variants(created.product_id);
    let straight_id = before
        .iter()
        .find(|v| v.record.name == "Straight")
        .unwrap()
        .id;

    let stored = store.load_product(created.product_id).await.unwrap();
    let mut edit =
        ProductForm::edit(&default_catalogue().unwrap(), &AdminConfig::default(), &stored);
    let texture = GroupKey::custom("Texture");
    edit.options_mut().remove_value(&texture, "Wavy").unwrap();
    edit.options_mut().add_value(&texture, "Curly").unwrap();
    edit.options_mut()
        .set_field(key("Curly"), VariantField::Stock, "10");

    let outcome = edit.save(&store).await.unwrap();

    assert_eq!(outcome.variants.inserted, 1);
    assert_eq!(outcome.variants.deleted, 1);

    let after = store.variants(created.product_id);
    let names: Vec<_> = after.iter().map(|v| v.record.name.as_str()).collect();
    assert_eq!(names, ["Straight", "Curly"]);
    assert_eq!(after.first().unwrap().id, straight_id);
    assert_eq!(store.product(created.product_id).unwrap().quantity, 13);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_failed_step_stops_the_save() {
    let store = InMemoryCatalogStore::new();
    store.fail_on(StoreOperation::ReplaceImages);
    let mut form = textured_form("Bob Wig");

    let err = form.save(&store).await.unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(err.user_message(), "Error: Internal server error");
    assert_eq!(form.mode(), FormMode::Create);
    assert_eq!(store.product_count(), 1);
    let calls = store.calls();
    assert!(calls.contains(&StoreOperation::CreateProduct));
    assert!(!calls.contains(&StoreOperation::ApplyVariantChanges));
}

#[tokio::test]
async fn test_duplicate_slug_is_reported() {
    let store = InMemoryCatalogStore::new();
    textured_form("Pixie Cut").save(&store).await.unwrap();

    let err = textured_form("Pixie Cut").save(&store).await.unwrap_err();

    assert!(!err.is_server_error());
    assert!(err.user_message().starts_with("Error: "));
    assert_eq!(store.product_count(), 1);
}

#[tokio::test]
async fn test_too_many_variant_groups_writes_nothing() {
    let store = InMemoryCatalogStore::new();
    let mut form = new_form();
    form.set_name("Overloaded");
    for name in ["A", "B", "C", "D"] {
        let options = form.options_mut();
        options.create_group(name);
        let group = GroupKey::custom(name);
        options.add_value(&group, "x").unwrap();
        options.set_participates_in_variants(&group, true).unwrap();
    }

    let err = form.save(&store).await.unwrap_err();

    assert!(matches!(err, AppError::Projection(_)));
    assert!(store.calls().is_empty());
}
