//! Variant generation.
//!
//! Variants are derived, never edited directly: the enabled variant-generating
//! option groups define a Cartesian product of values, and every tuple in that
//! product is one sellable variant. Per-variant price, stock and SKU live in an
//! override store keyed by the tuple itself, so recomputing the product after
//! an option change never moves data between rows.

mod combinations;
mod key;
mod overrides;
mod product_options;
mod projection;
mod reconcile;

pub use combinations::{VariantGroup, generate_combinations};
pub use key::VariantKey;
pub use overrides::{OverrideStore, VariantField, VariantOverride};
pub use product_options::{OrphanPolicy, ProductOptions, Variant};
pub use projection::{MAX_OPTION_COLUMNS, OptionsProjection, ProjectionError, VariantRecord};
pub use reconcile::{StoredVariant, VariantChangeSet, reconcile};
