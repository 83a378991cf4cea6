//! Product form files.
//!
//! A form file is the YAML equivalent of filling in the product editor:
//!
//! ```yaml
//! product:
//!   name: Deep Wave Wig
//!   keywords: wig, deep wave
//! base_price: "129.99"
//! options:
//!   - group: color
//!     variants: true
//!     swatches:
//!       - { label: Jet Black, color: "#0a0a0a" }
//!   - group: length
//!     values: ['14"', '16"']
//!   - custom: Cap Size
//!     values: [Small, Large]
//! bulk:
//!   stock: "5"
//! variants:
//!   - key: [Jet Black, '14"', Small]
//!     price: "139.99"
//! media:
//!   - photos/front.jpg
//! ```
//!
//! Entries are applied in order on top of the form's current state, so the
//! same file works for new products and for edits. Product fields the file
//! leaves out keep their current value, and a `values` or `swatches` list
//! only touches the values that differ from the group's current ones.

use std::path::{Path, PathBuf};

use catalog_admin::services::ProductForm;
use catalog_admin::storage::UploadFile;
use catalog_core::options::{ColorId, OptionValue, Swatch};
use catalog_core::{
    CategoryId, GroupKey, OptionError, OrphanPolicy, ProductOptions, ProductStatus, VariantField,
    VariantKey,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading or applying a form file.
#[derive(Debug, Error)]
pub enum FormFileError {
    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The form file is not valid YAML for a form.
    #[error("failed to parse form file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An option entry names neither a catalogue group nor a custom group.
    #[error("option entry must set exactly one of `group` or `custom`")]
    AmbiguousGroup,

    /// An option edit was rejected.
    #[error("option error: {0}")]
    Option(#[from] OptionError),

    /// A media file has an extension with no known content type.
    #[error("unsupported media file: {0}")]
    UnsupportedMedia(String),
}

/// A product form file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormFile {
    pub product: Option<ProductPatch>,
    pub base_price: Option<String>,
    pub orphans: Option<OrphanPolicy>,
    pub options: Vec<OptionEntry>,
    /// Values set on every variant before per-variant entries.
    pub bulk: BulkEntry,
    pub variants: Vec<VariantEntry>,
    /// Media files to upload, relative to the form file.
    pub media: Vec<PathBuf>,
}

/// Product fields to set. Absent fields keep the form's value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub compare_at_price: Option<String>,
    /// A blank SKU keeps the form's SKU.
    pub sku: Option<String>,
    pub stock: Option<String>,
    pub moq: Option<String>,
    pub low_stock_threshold: Option<String>,
    pub status: Option<ProductStatus>,
    pub featured: Option<bool>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub keywords: Option<String>,
    pub preorder_shipping: Option<String>,
}

/// Option group settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionEntry {
    /// Catalogue group key; the group is switched on.
    pub group: Option<String>,
    /// Custom group name; the group is created if missing.
    pub custom: Option<String>,
    /// Replaces the value list when present.
    pub values: Option<Vec<String>>,
    /// Replaces the swatch list of a color group when present.
    pub swatches: Option<Vec<SwatchEntry>>,
    /// Sets whether the group generates variants.
    pub variants: Option<bool>,
    /// Switches a catalogue group off or deletes a custom group.
    pub remove: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwatchEntry {
    #[serde(default)]
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BulkEntry {
    pub price: Option<String>,
    pub stock: Option<String>,
}

/// Values for one combination.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantEntry {
    pub key: VariantKey,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub stock: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
}

impl FormFile {
    /// Read and parse a form file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, FormFileError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FormFileError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::parse(&content)
    }

    /// Parse form file YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a form.
    pub fn parse(yaml: &str) -> Result<Self, FormFileError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply the text fields and options to a form.
    ///
    /// # Errors
    ///
    /// Returns an error if an option entry is malformed or rejected.
    pub fn apply(&self, form: &mut ProductForm) -> Result<(), FormFileError> {
        if let Some(product) = &self.product {
            product.apply(form);
        }
        self.apply_options(form.options_mut())
    }

    /// Apply only the option, bulk and variant entries.
    ///
    /// # Errors
    ///
    /// Returns an error if an option entry is malformed or rejected.
    pub fn apply_options(&self, options: &mut ProductOptions) -> Result<(), FormFileError> {
        if let Some(policy) = self.orphans {
            options.set_policy(policy);
        }
        if let Some(price) = &self.base_price {
            options.set_base_price(price.clone());
        }

        for entry in &self.options {
            entry.apply(options)?;
        }

        if let Some(price) = &self.bulk.price {
            options.bulk_set(VariantField::Price, price);
        }
        if let Some(stock) = &self.bulk.stock {
            options.bulk_set(VariantField::Stock, stock);
        }

        for variant in &self.variants {
            let fields = [
                (VariantField::Price, &variant.price),
                (VariantField::Stock, &variant.stock),
                (VariantField::Sku, &variant.sku),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    options.set_field(variant.key.clone(), field, value.clone());
                }
            }
        }
        Ok(())
    }

    /// Read the media files, resolving paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or has an unknown type.
    pub async fn media_files(&self, base_dir: &Path) -> Result<Vec<UploadFile>, FormFileError> {
        let mut files = Vec::with_capacity(self.media.len());
        for path in &self.media {
            let path = base_dir.join(path);
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content_type = content_type_for(&file_name)
                .ok_or_else(|| FormFileError::UnsupportedMedia(path.display().to_string()))?;
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| FormFileError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
            files.push(UploadFile::new(file_name, content_type, bytes));
        }
        Ok(files)
    }
}

impl ProductPatch {
    fn apply(&self, form: &mut ProductForm) {
        let draft = form.draft_mut();
        set_text(&mut draft.slug, self.slug.as_ref());
        set_text(&mut draft.description, self.description.as_ref());
        set_text(&mut draft.compare_at_price, self.compare_at_price.as_ref());
        set_text(
            &mut draft.sku,
            self.sku.as_ref().filter(|sku| !sku.trim().is_empty()),
        );
        set_text(&mut draft.stock, self.stock.as_ref());
        set_text(&mut draft.moq, self.moq.as_ref());
        set_text(&mut draft.low_stock_threshold, self.low_stock_threshold.as_ref());
        set_text(&mut draft.seo_title, self.seo_title.as_ref());
        set_text(&mut draft.seo_description, self.seo_description.as_ref());
        set_text(&mut draft.keywords, self.keywords.as_ref());
        set_text(&mut draft.preorder_shipping, self.preorder_shipping.as_ref());
        if let Some(category_id) = self.category_id {
            draft.category_id = Some(category_id);
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(featured) = self.featured {
            draft.featured = featured;
        }

        // Last, so a new product without a slug gets one from the name.
        if let Some(name) = &self.name {
            form.set_name(name.clone());
        }
    }
}

fn set_text(field: &mut String, value: Option<&String>) {
    if let Some(value) = value {
        field.clone_from(value);
    }
}

impl OptionEntry {
    fn key(&self) -> Result<GroupKey, FormFileError> {
        match (&self.group, &self.custom) {
            (Some(key), None) => Ok(GroupKey::predefined(key.trim())),
            (None, Some(name)) => Ok(GroupKey::custom(name.trim())),
            _ => Err(FormFileError::AmbiguousGroup),
        }
    }

    fn apply(&self, options: &mut ProductOptions) -> Result<(), FormFileError> {
        let key = self.key()?;

        if self.remove {
            match &key {
                GroupKey::Predefined(name) => {
                    if options.registry().is_enabled(name) {
                        options.toggle_group(name)?;
                    }
                }
                GroupKey::Custom(name) => {
                    options.delete_group(name);
                }
            }
            return Ok(());
        }

        match &key {
            GroupKey::Predefined(name) => {
                if !options.registry().is_enabled(name) {
                    options.toggle_group(name)?;
                }
            }
            GroupKey::Custom(name) => {
                options.create_group(name);
            }
        }

        if let Some(values) = &self.values {
            sync_values(options, &key, values)?;
        }
        if let Some(swatches) = &self.swatches {
            sync_swatches(options, &key, swatches)?;
        }
        if let Some(participates) = self.variants {
            options.set_participates_in_variants(&key, participates)?;
        }
        Ok(())
    }
}

/// Make the group's text values equal `values`.
///
/// Values present in both lists are left in place so their variant data
/// survives under the discard policy; new values are appended.
fn sync_values(
    options: &mut ProductOptions,
    key: &GroupKey,
    values: &[String],
) -> Result<(), FormFileError> {
    let wanted: Vec<&str> = values.iter().map(|v| v.trim()).collect();
    for label in current_labels(options, key) {
        if !wanted.contains(&label.as_str()) {
            options.remove_value(key, &label)?;
        }
    }
    for value in values {
        options.add_value(key, value)?;
    }
    Ok(())
}

/// Make the group's swatches equal `swatches`, as [`sync_values`] does.
///
/// A swatch is kept only when both its label and its color are unchanged.
fn sync_swatches(
    options: &mut ProductOptions,
    key: &GroupKey,
    swatches: &[SwatchEntry],
) -> Result<(), FormFileError> {
    let wanted = swatches
        .iter()
        .map(|swatch| Ok(Swatch::new(&swatch.label, ColorId::parse(&swatch.color)?)))
        .collect::<Result<Vec<_>, OptionError>>()?;

    let stale: Vec<String> = options
        .registry()
        .group(key)
        .map(|group| {
            group
                .values()
                .iter()
                .filter(|value| match value {
                    OptionValue::Swatch(swatch) => !wanted.contains(swatch),
                    OptionValue::Text(_) => true,
                })
                .map(|value| value.label().to_string())
                .collect()
        })
        .unwrap_or_default();
    for label in stale {
        options.remove_value(key, &label)?;
    }
    for swatch in swatches {
        options.add_swatch(key, &swatch.label, &swatch.color)?;
    }
    Ok(())
}

fn current_labels(options: &ProductOptions, key: &GroupKey) -> Vec<String> {
    options
        .registry()
        .group(key)
        .map(|group| group.labels())
        .unwrap_or_default()
}

/// Content type of an upload, judged by its extension.
pub(crate) fn content_type_for(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let content_type = match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        _ => return None,
    };
    Some(content_type)
}
