//! Projection of product options to stored variant rows and metadata, and back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ProductOptions, VariantKey, VariantOverride};
use crate::options::{OptionCatalogue, OptionRegistry, OptionsMetadata};
use crate::types::{parse_price, parse_quantity};

/// Number of option columns a stored variant row has.
pub const MAX_OPTION_COLUMNS: usize = 3;

/// Errors that can occur when projecting options for storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// More variant-generating groups than stored option columns.
    #[error("{count} variant option groups exceed the {max} available option columns")]
    TooManyOptionGroups {
        /// Variant-generating groups in use.
        count: usize,
        /// Option columns available.
        max: usize,
    },
}

/// A variant row ready for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Zero-based grid position.
    pub position: i32,
    /// Display name, e.g. `Red / 10"`.
    pub name: String,
    /// Option values in column order.
    pub option_values: Vec<String>,
    pub price: Decimal,
    pub stock: i64,
    pub sku: Option<String>,
}

impl VariantRecord {
    /// The combination this row stores.
    #[must_use]
    pub fn key(&self) -> VariantKey {
        self.option_values
            .iter()
            .filter(|value| !value.is_empty())
            .cloned()
            .collect()
    }

    /// Value of option column `index` (zero-based).
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.option_values.get(index).map(String::as_str)
    }
}

/// Everything [`ProductOptions::project`] produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsProjection {
    /// One row per current combination, in grid order.
    pub variants: Vec<VariantRecord>,
    /// Registry state for product metadata.
    pub metadata: OptionsMetadata,
}

impl ProductOptions {
    /// Project the current state for storage.
    ///
    /// Only current combinations become rows; orphaned overrides are not
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::TooManyOptionGroups`] when more groups
    /// generate variants than there are option columns.
    pub fn project(&self) -> Result<OptionsProjection, ProjectionError> {
        let count = self.registry().variant_groups().len();
        if count > MAX_OPTION_COLUMNS {
            return Err(ProjectionError::TooManyOptionGroups {
                count,
                max: MAX_OPTION_COLUMNS,
            });
        }

        let variants = self
            .variants()
            .into_iter()
            .enumerate()
            .map(|(index, variant)| VariantRecord {
                position: i32::try_from(index).unwrap_or(i32::MAX),
                name: variant.key.display_name(),
                option_values: variant.key.values().to_vec(),
                price: parse_price(&variant.price),
                stock: parse_quantity(&variant.stock),
                sku: (!variant.sku.is_empty()).then_some(variant.sku),
            })
            .collect();

        Ok(OptionsProjection {
            variants,
            metadata: self.registry().to_metadata(),
        })
    }

    /// Rebuild product options from stored metadata and variant rows.
    ///
    /// Each row's first `option_names.len()` non-empty option values form its
    /// key; rows without any are skipped.
    #[must_use]
    pub fn restore(
        catalogue: &OptionCatalogue,
        metadata: &OptionsMetadata,
        variants: &[VariantRecord],
        base_price: impl Into<String>,
    ) -> Self {
        let mut options = Self::from_registry(OptionRegistry::from_metadata(catalogue, metadata));
        options.set_base_price(base_price);

        let width = metadata.option_names.len();
        for record in variants {
            let key: VariantKey = record
                .option_values
                .iter()
                .take(width)
                .filter(|value| !value.is_empty())
                .cloned()
                .collect();
            if key.is_empty() {
                continue;
            }
            options.insert_override(
                key,
                VariantOverride {
                    price: Some(record.price.to_string()),
                    stock: Some(record.stock.to_string()),
                    sku: Some(record.sku.clone().unwrap_or_default()),
                },
            );
        }

        options
    }
}
