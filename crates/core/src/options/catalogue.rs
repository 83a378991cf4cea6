//! The predefined option catalogue.
//!
//! The catalogue is configuration, not code: the admin crate loads it from
//! YAML and hands it to [`OptionRegistry`](super::OptionRegistry).
//!
//! ```yaml
//! - key: length
//!   label: Length
//!   default_values: ['10"', '12"', '14"']
//!   generates_variants: true
//! - key: color
//!   label: Color
//!   kind: color
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::OptionError;

/// How values of a group are entered and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Free text values.
    #[default]
    Values,
    /// Color swatches (label plus color identifier).
    Color,
}

/// Definition of a predefined option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroupDef {
    /// Stable identity key, used in stored metadata.
    pub key: String,
    /// Display name, used as the variant option name.
    pub label: String,
    #[serde(default)]
    pub kind: OptionKind,
    /// Values a product starts with when the group is switched on.
    #[serde(default)]
    pub default_values: Vec<String>,
    /// Whether the group generates price/stock variants by default.
    #[serde(default)]
    pub generates_variants: bool,
}

/// Ordered set of predefined option groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionCatalogue {
    groups: Vec<OptionGroupDef>,
}

impl OptionCatalogue {
    /// Build a catalogue, checking that keys are unique and non-blank.
    ///
    /// # Errors
    ///
    /// Returns an error for blank keys or labels and for duplicate keys.
    pub fn new(groups: Vec<OptionGroupDef>) -> Result<Self, OptionError> {
        let catalogue = Self { groups };
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Check a deserialized catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error for blank keys or labels and for duplicate keys.
    pub fn validate(&self) -> Result<(), OptionError> {
        let mut seen = HashSet::new();
        for def in &self.groups {
            if def.key.trim().is_empty() {
                return Err(OptionError::MissingField("key"));
            }
            if def.label.trim().is_empty() {
                return Err(OptionError::MissingField("label"));
            }
            if !seen.insert(def.key.as_str()) {
                return Err(OptionError::DuplicateKey(def.key.clone()));
            }
        }
        Ok(())
    }

    /// Look up a definition by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionGroupDef> {
        self.groups.iter().find(|def| def.key == key)
    }

    /// Definitions in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionGroupDef> {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn def(key: &str, label: &str) -> OptionGroupDef {
        OptionGroupDef {
            key: key.to_string(),
            label: label.to_string(),
            kind: OptionKind::Values,
            default_values: Vec::new(),
            generates_variants: false,
        }
    }

    #[test]
    fn test_catalogue_rejects_duplicate_keys() {
        let result = OptionCatalogue::new(vec![def("length", "Length"), def("length", "Size")]);
        assert_eq!(result, Err(OptionError::DuplicateKey("length".to_string())));
    }

    #[test]
    fn test_catalogue_rejects_blank_fields() {
        assert_eq!(
            OptionCatalogue::new(vec![def(" ", "Length")]),
            Err(OptionError::MissingField("key"))
        );
        assert_eq!(
            OptionCatalogue::new(vec![def("length", "")]),
            Err(OptionError::MissingField("label"))
        );
    }

    #[test]
    fn test_catalogue_deserializes_with_defaults() {
        let json = r#"[{"key": "color", "label": "Color", "kind": "color"},
                       {"key": "length", "label": "Length", "default_values": ["10\""], "generates_variants": true}]"#;
        let catalogue: OptionCatalogue = serde_json::from_str(json).unwrap();
        catalogue.validate().unwrap();

        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.get("color").unwrap().kind, OptionKind::Color);
        assert!(catalogue.get("length").unwrap().generates_variants);
        assert!(catalogue.get("density").is_none());
    }
}
