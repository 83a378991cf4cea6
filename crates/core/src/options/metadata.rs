//! Stored form of the option registry.
//!
//! Product metadata keeps three entries (field names are shared with
//! existing stored products, hence the mixed casing):
//!
//! ```json
//! {
//!   "option_names": ["Length"],
//!   "product_options": {
//!     "length": { "values": ["10\"", "12\""], "generatesVariants": true, "enabled": true }
//!   },
//!   "custom_option_groups": [
//!     { "name": "Scent", "values": ["Vanilla"], "generatesVariants": false }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{OptionCatalogue, OptionRegistry, OptionValue};

const fn enabled_by_default() -> bool {
    true
}

/// Stored state of a catalogue group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOptionGroup {
    /// Value list; catalogue defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<OptionValue>>,
    /// Variant flag; the catalogue default applies when absent.
    #[serde(
        rename = "generatesVariants",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generates_variants: Option<bool>,
    /// Groups stored before this flag existed were only stored when enabled.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Stored state of a custom group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCustomGroup {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(rename = "generatesVariants", default)]
    pub generates_variants: bool,
}

/// Option state as persisted in product metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionsMetadata {
    /// Names of the variant-generating groups, in option column order.
    #[serde(default)]
    pub option_names: Vec<String>,
    /// Catalogue groups that differ from the catalogue, by key.
    #[serde(default)]
    pub product_options: BTreeMap<String, StoredOptionGroup>,
    /// Custom groups in creation order.
    #[serde(default)]
    pub custom_option_groups: Vec<StoredCustomGroup>,
}

impl OptionRegistry {
    /// Capture the registry for storage.
    ///
    /// Catalogue groups still in their catalogue state are left out; they
    /// come back from the catalogue on restore.
    #[must_use]
    pub fn to_metadata(&self) -> OptionsMetadata {
        let product_options = self
            .predefined()
            .iter()
            .filter(|p| p.is_customized())
            .map(|p| {
                let stored = StoredOptionGroup {
                    values: Some(p.group().values().to_vec()),
                    generates_variants: Some(p.group().generates_variants()),
                    enabled: p.is_enabled(),
                };
                (p.key().to_string(), stored)
            })
            .collect();

        let custom_option_groups = self
            .custom()
            .iter()
            .map(|g| StoredCustomGroup {
                name: g.name().to_string(),
                values: g.labels(),
                generates_variants: g.generates_variants(),
            })
            .collect();

        OptionsMetadata {
            option_names: self.variant_groups().into_iter().map(|g| g.name).collect(),
            product_options,
            custom_option_groups,
        }
    }

    /// Rebuild a registry from stored metadata.
    ///
    /// Keys the catalogue no longer defines are skipped, as are stored values
    /// that no longer fit their group.
    #[must_use]
    pub fn from_metadata(catalogue: &OptionCatalogue, metadata: &OptionsMetadata) -> Self {
        let mut registry = Self::new(catalogue);

        for (key, stored) in &metadata.product_options {
            // Retired catalogue keys restore nothing.
            registry.restore_predefined(
                key,
                stored.enabled,
                stored.values.clone(),
                stored.generates_variants,
            );
        }

        for custom in &metadata.custom_option_groups {
            registry.restore_custom(&custom.name, &custom.values, custom.generates_variants);
        }

        registry
    }
}
