//! Catalog Core - Product option and variant model.
//!
//! This crate provides the pure domain model behind the product editor:
//! - option groups and their value lists
//! - the combination engine that turns option groups into sellable variants
//! - per-variant price/stock/SKU overrides
//! - the projection to and from persisted variant rows and metadata
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. The `catalog-admin` crate wires it to storage.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, statuses, lenient numeric parsing, media classification
//! - [`options`] - Option catalogue and the option group registry
//! - [`variants`] - Combination engine, override store, projection, reconciliation
//! - [`product`] - Product draft and persisted product records
//! - [`sku`] / [`slug`] - Generated identifiers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod options;
pub mod product;
pub mod sku;
pub mod slug;
pub mod types;
pub mod variants;

#[cfg(test)]
mod test_support;

pub use options::{
    GroupKey, OptionCatalogue, OptionError, OptionGroup, OptionGroupDef, OptionKind,
    OptionRegistry, OptionValue,
};
pub use product::{
    Category, ImageRecord, ProductDraft, ProductMetadata, ProductRecord, StoredProduct,
};
pub use sku::SkuGenerator;
pub use slug::slugify;
pub use types::*;
pub use variants::{
    OrphanPolicy, ProductOptions, ProjectionError, StoredVariant, Variant, VariantChangeSet,
    VariantField, VariantKey, VariantOverride, VariantRecord, reconcile,
};
