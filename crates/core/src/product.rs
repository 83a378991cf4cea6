//! Product listing records.
//!
//! [`ProductDraft`] holds the form's free-text fields. Building it against a
//! product's [`ProductOptions`] yields the [`ProductRecord`] and variant rows
//! that get stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::options::OptionsMetadata;
use crate::sku::SkuGenerator;
use crate::slug::slugify;
use crate::types::{
    CategoryId, MediaItem, ProductId, ProductStatus, nonzero_or, parse_leading_decimal, parse_price,
};
use crate::variants::{ProductOptions, ProjectionError, StoredVariant, VariantRecord};

/// Default minimum order quantity.
pub const DEFAULT_MOQ: i64 = 1;
/// Default low-stock warning threshold.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Free-text product fields as entered in the form.
///
/// The base price is not here: it lives on [`ProductOptions`] because every
/// variant falls back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub compare_at_price: String,
    pub sku: String,
    /// Stock used when the product has no variants.
    pub stock: String,
    pub moq: String,
    pub low_stock_threshold: String,
    pub status: ProductStatus,
    pub featured: bool,
    pub seo_title: String,
    pub seo_description: String,
    /// Comma-separated keywords, stored as tags.
    pub keywords: String,
    pub preorder_shipping: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            category_id: None,
            compare_at_price: String::new(),
            sku: String::new(),
            stock: String::new(),
            moq: DEFAULT_MOQ.to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD.to_string(),
            status: ProductStatus::Active,
            featured: false,
            seo_title: String::new(),
            seo_description: String::new(),
            keywords: String::new(),
            preorder_shipping: String::new(),
        }
    }
}

impl ProductDraft {
    /// Fill the draft from a stored product, for editing.
    #[must_use]
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            slug: record.slug.clone(),
            description: record.description.clone(),
            category_id: record.category_id,
            compare_at_price: record
                .compare_at_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
            sku: record.sku.clone(),
            stock: record.quantity.to_string(),
            moq: record.moq.to_string(),
            low_stock_threshold: record.metadata.low_stock_threshold.to_string(),
            status: record.status,
            featured: record.featured,
            seo_title: record.seo_title.clone(),
            seo_description: record.seo_description.clone(),
            keywords: record.tags.join(", "),
            preorder_shipping: record.metadata.preorder_shipping.clone().unwrap_or_default(),
        }
    }

    /// Build the stored product and its variant rows.
    ///
    /// - the slug falls back to one derived from the name
    /// - the SKU falls back to a generated one
    /// - the quantity is the variant stock total when variants exist
    ///
    /// # Errors
    ///
    /// Returns a [`ProjectionError`] if the options cannot be stored.
    pub fn build(
        &self,
        options: &ProductOptions,
        skus: &SkuGenerator,
    ) -> Result<(ProductRecord, Vec<VariantRecord>), ProjectionError> {
        let projection = options.project()?;

        let slug = if self.slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            self.slug.trim().to_string()
        };
        let sku = if self.sku.trim().is_empty() {
            skus.generate()
        } else {
            self.sku.trim().to_string()
        };
        let preorder_shipping = self.preorder_shipping.trim();

        let record = ProductRecord {
            name: self.name.trim().to_string(),
            slug,
            description: self.description.clone(),
            category_id: self.category_id,
            price: parse_price(options.base_price()),
            compare_at_price: parse_leading_decimal(&self.compare_at_price),
            sku,
            quantity: options.stock_quantity(&self.stock),
            moq: i32::try_from(nonzero_or(&self.moq, DEFAULT_MOQ)).unwrap_or(i32::MAX),
            status: self.status,
            featured: self.featured,
            seo_title: self.seo_title.clone(),
            seo_description: self.seo_description.clone(),
            tags: split_tags(&self.keywords),
            metadata: ProductMetadata {
                low_stock_threshold: nonzero_or(
                    &self.low_stock_threshold,
                    DEFAULT_LOW_STOCK_THRESHOLD,
                ),
                preorder_shipping: (!preorder_shipping.is_empty())
                    .then(|| preorder_shipping.to_string()),
                options: projection.metadata,
            },
        };

        Ok((record, projection.variants))
    }
}

/// Split comma-separated keywords, dropping blanks.
#[must_use]
pub fn split_tags(keywords: &str) -> Vec<String> {
    keywords
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Product metadata stored alongside the record (a JSON column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub preorder_shipping: Option<String>,
    #[serde(flatten)]
    pub options: OptionsMetadata,
}

const fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl Default for ProductMetadata {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            preorder_shipping: None,
            options: OptionsMetadata::default(),
        }
    }
}

/// A product as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub sku: String,
    pub quantity: i64,
    pub moq: i32,
    pub status: ProductStatus,
    pub featured: bool,
    pub seo_title: String,
    pub seo_description: String,
    pub tags: Vec<String>,
    pub metadata: ProductMetadata,
}

/// A stored product image or video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub position: i32,
    pub alt_text: String,
}

impl ImageRecord {
    /// Image rows for `media`, renumbered in order, alt text set to the product name.
    #[must_use]
    pub fn from_media(media: &[MediaItem], product_name: &str) -> Vec<Self> {
        media
            .iter()
            .zip(0..)
            .map(|(item, position)| Self {
                url: item.url.clone(),
                position,
                alt_text: product_name.to_string(),
            })
            .collect()
    }
}

/// A product with its images and variant rows, as loaded for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProduct {
    pub id: ProductId,
    pub record: ProductRecord,
    pub images: Vec<ImageRecord>,
    pub variants: Vec<StoredVariant>,
}

impl StoredProduct {
    /// Media items in stored order, classified by URL.
    #[must_use]
    pub fn media(&self) -> Vec<MediaItem> {
        let mut images = self.images.clone();
        images.sort_by_key(|image| image.position);
        images
            .into_iter()
            .zip(0..)
            .map(|(image, position)| MediaItem::from_url(image.url, position))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::GroupKey;
    use crate::test_support::catalogue;
    use crate::variants::VariantField;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Deep Wave 14\" Wig!".to_string(),
            stock: "8".to_string(),
            keywords: "wig, deep wave, , hd lace ".to_string(),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_build_simple_product() {
        let mut options = ProductOptions::new(&catalogue());
        options.set_base_price("129.99");
        let (record, variants) = draft().build(&options, &SkuGenerator::new("WIG")).unwrap();

        assert!(variants.is_empty());
        assert_eq!(record.slug, "deep-wave-14-wig");
        assert!(record.sku.starts_with("WIG-"));
        assert_eq!(record.price, Decimal::new(12999, 2));
        assert_eq!(record.compare_at_price, None);
        assert_eq!(record.quantity, 8);
        assert_eq!(record.moq, 1);
        assert_eq!(record.tags, vec!["wig", "deep wave", "hd lace"]);
        assert_eq!(record.metadata.low_stock_threshold, 5);
        assert_eq!(record.metadata.preorder_shipping, None);
    }

    #[test]
    fn test_build_keeps_entered_slug_and_sku() {
        let draft = ProductDraft {
            slug: "custom-slug".to_string(),
            sku: "WIG-0001".to_string(),
            compare_at_price: "150".to_string(),
            moq: "0".to_string(),
            preorder_shipping: " Ships in 2 weeks ".to_string(),
            ..draft()
        };
        let options = ProductOptions::new(&catalogue());
        let (record, _) = draft.build(&options, &SkuGenerator::default()).unwrap();

        assert_eq!(record.slug, "custom-slug");
        assert_eq!(record.sku, "WIG-0001");
        assert_eq!(record.compare_at_price, Some(Decimal::new(150, 0)));
        assert_eq!(record.moq, 1);
        assert_eq!(
            record.metadata.preorder_shipping.as_deref(),
            Some("Ships in 2 weeks")
        );
    }

    #[test]
    fn test_build_syncs_quantity_with_variants() {
        let mut options = ProductOptions::new(&catalogue());
        options.set_base_price("100");
        options.toggle_group("length").unwrap();
        options.set_field(
            ["10\""].into_iter().collect(),
            VariantField::Stock,
            "3",
        );
        options.set_field(
            ["12\""].into_iter().collect(),
            VariantField::Stock,
            "4",
        );
        let (record, variants) = draft().build(&options, &SkuGenerator::default()).unwrap();

        assert_eq!(variants.len(), 2);
        assert_eq!(record.quantity, 7);
        assert_eq!(record.metadata.options.option_names, vec!["Length"]);
    }

    #[test]
    fn test_metadata_json_is_flat() {
        let mut options = ProductOptions::new(&catalogue());
        options.toggle_group("length").unwrap();
        options
            .add_value(&GroupKey::predefined("length"), "14\"")
            .unwrap();
        let (record, _) = draft().build(&options, &SkuGenerator::default()).unwrap();

        let json = serde_json::to_value(&record.metadata).unwrap();
        assert_eq!(json["low_stock_threshold"], 5);
        assert_eq!(json["option_names"][0], "Length");
        assert_eq!(json["product_options"]["length"]["generatesVariants"], true);

        let parsed: ProductMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record.metadata);
    }

    #[test]
    fn test_draft_from_record_round_trip() {
        let options = ProductOptions::new(&catalogue());
        let original = ProductDraft {
            sku: "WIG-1".to_string(),
            slug: "deep-wave".to_string(),
            keywords: "wig, curly".to_string(),
            ..draft()
        };
        let (record, _) = original.build(&options, &SkuGenerator::default()).unwrap();
        let reloaded = ProductDraft::from_record(&record);

        assert_eq!(reloaded.sku, "WIG-1");
        assert_eq!(reloaded.keywords, "wig, curly");
        assert_eq!(reloaded.stock, "8");
        assert_eq!(reloaded.moq, "1");
    }

    #[test]
    fn test_image_records_from_media() {
        let media = vec![
            MediaItem::from_url("https://cdn.example.com/a.jpg", 3),
            MediaItem::from_url("https://cdn.example.com/b.mp4", 7),
        ];
        let images = ImageRecord::from_media(&media, "Body Wave");
        assert_eq!(images[0].position, 0);
        assert_eq!(images[1].position, 1);
        assert!(images.iter().all(|i| i.alt_text == "Body Wave"));
    }
}
