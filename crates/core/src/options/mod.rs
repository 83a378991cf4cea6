//! Product option groups.
//!
//! An option group is a named, ordered list of values ("Length": `10"`, `12"`).
//! Groups come in two flavors:
//!
//! - **Predefined** groups come from an injected [`OptionCatalogue`]. They have
//!   a fixed key, can be switched on and off per product, and may carry a
//!   default value list.
//! - **Custom** groups are created by name for products the catalogue does not
//!   cover (scent, material, ...).
//!
//! Both flavors reduce to a [`VariantGroup`](crate::variants::VariantGroup)
//! when they generate variants.

mod catalogue;
mod error;
mod metadata;
mod registry;
mod value;

pub use catalogue::{OptionCatalogue, OptionGroupDef, OptionKind};
pub use error::OptionError;
pub use metadata::{OptionsMetadata, StoredCustomGroup, StoredOptionGroup};
pub use registry::{GroupKey, OptionGroup, OptionRegistry, PredefinedGroup};
pub use value::{ColorId, OptionValue, Swatch};
