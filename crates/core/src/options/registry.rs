//! The option group registry: per-product state of every option group.

use std::fmt;

use super::value::{ColorId, Swatch};
use super::{OptionCatalogue, OptionError, OptionGroupDef, OptionKind, OptionValue};
use crate::variants::VariantGroup;

/// Identifies a group in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// A catalogue group, by catalogue key.
    Predefined(String),
    /// A custom group, by name.
    Custom(String),
}

impl GroupKey {
    #[must_use]
    pub fn predefined(key: impl Into<String>) -> Self {
        Self::Predefined(key.into())
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Predefined(key) | Self::Custom(key) => key,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, ordered list of unique option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    name: String,
    kind: OptionKind,
    values: Vec<OptionValue>,
    generates_variants: bool,
}

impl OptionGroup {
    /// An empty group.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            values: Vec::new(),
            generates_variants: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    #[must_use]
    pub fn values(&self) -> &[OptionValue] {
        &self.values
    }

    /// Whether the group is flagged as variant-generating.
    #[must_use]
    pub const fn generates_variants(&self) -> bool {
        self.generates_variants
    }

    /// Whether the group currently contributes to the combination set.
    #[must_use]
    pub fn feeds_variants(&self) -> bool {
        self.generates_variants && !self.values.is_empty()
    }

    /// Value labels in order, as they appear in combinations.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(|v| v.label().to_string()).collect()
    }

    /// Append a value unless it duplicates an existing one.
    ///
    /// Swatches are unique by color and by label; text values by exact text.
    fn insert(&mut self, value: OptionValue) -> bool {
        let duplicate = match &value {
            OptionValue::Text(text) => self.values.iter().any(|v| v.label() == text),
            OptionValue::Swatch(swatch) => self.values.iter().any(|v| match v {
                OptionValue::Swatch(other) => {
                    other.color == swatch.color || other.label == swatch.label
                }
                OptionValue::Text(text) => *text == swatch.label,
            }),
        };
        if duplicate {
            return false;
        }
        self.values.push(value);
        true
    }

    fn push_text(&mut self, value: &str) -> Result<bool, OptionError> {
        if self.kind == OptionKind::Color {
            return Err(OptionError::KindMismatch {
                group: self.name.clone(),
                kind: "text",
            });
        }
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }
        Ok(self.insert(OptionValue::Text(value.to_string())))
    }

    fn push_swatch(&mut self, label: &str, color: &str) -> Result<bool, OptionError> {
        if self.kind != OptionKind::Color {
            return Err(OptionError::KindMismatch {
                group: self.name.clone(),
                kind: "color",
            });
        }
        let color = ColorId::parse(color)?;
        Ok(self.insert(OptionValue::Swatch(Swatch::new(label, color))))
    }

    fn remove(&mut self, value: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|v| !v.matches(value));
        self.values.len() != before
    }

    /// Replace the value list, coercing values to the group kind and dropping
    /// duplicates and values that cannot be coerced.
    fn replace_values<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = OptionValue>,
    {
        self.values.clear();
        for value in values {
            if let Some(value) = coerce(self.kind, value) {
                self.insert(value);
            }
        }
    }
}

/// Fit a stored value to a group kind.
///
/// Color groups accept swatches, legacy `label|#hex` strings and bare colors.
fn coerce(kind: OptionKind, value: OptionValue) -> Option<OptionValue> {
    match (kind, value) {
        (OptionKind::Values, OptionValue::Text(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| OptionValue::Text(text.to_string()))
        }
        (OptionKind::Values, OptionValue::Swatch(swatch)) => Some(OptionValue::Text(swatch.label)),
        (OptionKind::Color, OptionValue::Swatch(swatch)) => Some(OptionValue::Swatch(swatch)),
        (OptionKind::Color, OptionValue::Text(text)) => Swatch::from_legacy(&text)
            .or_else(|| ColorId::parse(&text).ok().map(|color| Swatch::new("", color)))
            .map(OptionValue::Swatch),
    }
}

/// A catalogue group together with its per-product state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredefinedGroup {
    def: OptionGroupDef,
    enabled: bool,
    group: OptionGroup,
}

impl PredefinedGroup {
    fn from_def(def: &OptionGroupDef) -> Self {
        let mut group = OptionGroup::new(def.label.clone(), def.kind);
        group.generates_variants = def.generates_variants;
        group.replace_values(default_values(def));
        Self {
            def: def.clone(),
            enabled: false,
            group,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.def.key
    }

    #[must_use]
    pub const fn def(&self) -> &OptionGroupDef {
        &self.def
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn group(&self) -> &OptionGroup {
        &self.group
    }

    /// Whether the state differs from a freshly loaded catalogue group.
    #[must_use]
    pub fn is_customized(&self) -> bool {
        self.enabled || *self != Self::from_def(&self.def)
    }
}

fn default_values(def: &OptionGroupDef) -> impl Iterator<Item = OptionValue> + '_ {
    def.default_values
        .iter()
        .map(|value| OptionValue::Text(value.clone()))
}

/// Every option group of one product: catalogue groups in catalogue order,
/// then custom groups in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionRegistry {
    predefined: Vec<PredefinedGroup>,
    custom: Vec<OptionGroup>,
}

impl OptionRegistry {
    /// A registry with every catalogue group disabled and holding its defaults.
    #[must_use]
    pub fn new(catalogue: &OptionCatalogue) -> Self {
        Self {
            predefined: catalogue.iter().map(PredefinedGroup::from_def).collect(),
            custom: Vec::new(),
        }
    }

    #[must_use]
    pub fn predefined(&self) -> &[PredefinedGroup] {
        &self.predefined
    }

    #[must_use]
    pub fn custom(&self) -> &[OptionGroup] {
        &self.custom
    }

    /// Look up a group.
    #[must_use]
    pub fn group(&self, key: &GroupKey) -> Option<&OptionGroup> {
        match key {
            GroupKey::Predefined(key) => self
                .predefined
                .iter()
                .find(|p| p.def.key == *key)
                .map(|p| &p.group),
            GroupKey::Custom(name) => self.custom.iter().find(|g| g.name == *name),
        }
    }

    /// Whether a catalogue group is switched on. Unknown keys are off.
    #[must_use]
    pub fn is_enabled(&self, key: &str) -> bool {
        self.predefined
            .iter()
            .any(|p| p.def.key == key && p.enabled)
    }

    fn predefined_mut(&mut self, key: &str) -> Result<&mut PredefinedGroup, OptionError> {
        self.predefined
            .iter_mut()
            .find(|p| p.def.key == key)
            .ok_or_else(|| OptionError::UnknownGroup(key.to_string()))
    }

    fn group_mut(&mut self, key: &GroupKey) -> Result<&mut OptionGroup, OptionError> {
        match key {
            GroupKey::Predefined(key) => Ok(&mut self.predefined_mut(key)?.group),
            GroupKey::Custom(name) => self
                .custom
                .iter_mut()
                .find(|g| g.name == *name)
                .ok_or_else(|| OptionError::UnknownGroup(name.clone())),
        }
    }

    /// Flip a catalogue group on or off, returning the new state.
    ///
    /// Switching a group off keeps its values for when it comes back.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownGroup`] if the key is not in the catalogue.
    pub fn toggle_group(&mut self, key: &str) -> Result<bool, OptionError> {
        let group = self.predefined_mut(key)?;
        group.enabled = !group.enabled;
        Ok(group.enabled)
    }

    /// Switch a catalogue group on or off.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownGroup`] if the key is not in the catalogue.
    pub fn set_enabled(&mut self, key: &str, enabled: bool) -> Result<(), OptionError> {
        self.predefined_mut(key)?.enabled = enabled;
        Ok(())
    }

    /// Mark or unmark a group as variant-generating.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownGroup`] if the group does not exist.
    pub fn set_participates_in_variants(
        &mut self,
        key: &GroupKey,
        participates: bool,
    ) -> Result<(), OptionError> {
        self.group_mut(key)?.generates_variants = participates;
        Ok(())
    }

    /// Append a trimmed text value. Blank or duplicate input returns `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist or is a color group.
    pub fn add_value(&mut self, key: &GroupKey, value: &str) -> Result<bool, OptionError> {
        self.group_mut(key)?.push_text(value)
    }

    /// Append a color swatch. A blank label falls back to the color itself.
    ///
    /// Returns `false` if the group already has a swatch with the same color
    /// or the same label.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist, is not a color group, or
    /// the color identifier is invalid.
    pub fn add_swatch(
        &mut self,
        key: &GroupKey,
        label: &str,
        color: &str,
    ) -> Result<bool, OptionError> {
        self.group_mut(key)?.push_swatch(label, color)
    }

    /// Remove a value by exact text (or swatch label/color).
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownGroup`] if the group does not exist.
    pub fn remove_value(&mut self, key: &GroupKey, value: &str) -> Result<bool, OptionError> {
        Ok(self.group_mut(key)?.remove(value))
    }

    /// Restore a catalogue group's built-in value list.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the group has no defaults.
    pub fn reset_to_defaults(&mut self, key: &str) -> Result<(), OptionError> {
        let predefined = self.predefined_mut(key)?;
        if predefined.def.default_values.is_empty() {
            return Err(OptionError::NoDefaults(key.to_string()));
        }
        let defaults: Vec<OptionValue> = default_values(&predefined.def).collect();
        predefined.group.replace_values(defaults);
        Ok(())
    }

    /// Create an empty custom group. Blank or taken names return `false`.
    pub fn create_group(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.custom.iter().any(|g| g.name == name) {
            return false;
        }
        self.custom.push(OptionGroup::new(name, OptionKind::Values));
        true
    }

    /// Delete a custom group. Returns `false` if there was none.
    pub fn delete_group(&mut self, name: &str) -> bool {
        let before = self.custom.len();
        self.custom.retain(|g| g.name != name);
        self.custom.len() != before
    }

    /// The groups that feed the combination engine, in order.
    ///
    /// Catalogue groups must be enabled; every group must be flagged as
    /// variant-generating and hold at least one value.
    #[must_use]
    pub fn variant_groups(&self) -> Vec<VariantGroup> {
        let predefined = self
            .predefined
            .iter()
            .filter(|p| p.enabled)
            .map(|p| &p.group);

        predefined
            .chain(self.custom.iter())
            .filter(|g| g.feeds_variants())
            .map(|g| VariantGroup::new(g.name.clone(), g.labels()))
            .collect()
    }

    /// Overwrite a catalogue group's state from stored metadata.
    ///
    /// Returns `false` without changes if the catalogue does not define `key`.
    pub(crate) fn restore_predefined(
        &mut self,
        key: &str,
        enabled: bool,
        values: Option<Vec<OptionValue>>,
        generates_variants: Option<bool>,
    ) -> bool {
        let Some(predefined) = self.predefined.iter_mut().find(|p| p.def.key == key) else {
            return false;
        };
        predefined.enabled = enabled;
        if let Some(values) = values {
            predefined.group.replace_values(values);
        }
        if let Some(generates) = generates_variants {
            predefined.group.generates_variants = generates;
        }
        true
    }

    /// Recreate a custom group from stored metadata.
    pub(crate) fn restore_custom(
        &mut self,
        name: &str,
        values: &[String],
        generates_variants: bool,
    ) {
        if !self.create_group(name) {
            return;
        }
        if let Some(group) = self.custom.last_mut() {
            group.replace_values(values.iter().map(|v| OptionValue::Text(v.clone())));
            group.generates_variants = generates_variants;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::catalogue;

    fn length() -> GroupKey {
        GroupKey::predefined("length")
    }

    #[test]
    fn test_new_registry_starts_disabled_with_defaults() {
        let registry = OptionRegistry::new(&catalogue());
        assert_eq!(registry.predefined().len(), 3);
        assert!(registry.predefined().iter().all(|p| !p.is_enabled()));
        assert_eq!(registry.group(&length()).unwrap().labels(), vec!["10\"", "12\""]);
        assert!(registry.variant_groups().is_empty());
    }

    #[test]
    fn test_toggle_group_keeps_values() {
        let mut registry = OptionRegistry::new(&catalogue());
        assert!(registry.toggle_group("length").unwrap());
        registry.add_value(&length(), "14\"").unwrap();
        assert!(!registry.toggle_group("length").unwrap());

        assert_eq!(registry.group(&length()).unwrap().values().len(), 3);
        assert!(registry.variant_groups().is_empty());

        registry.toggle_group("length").unwrap();
        assert_eq!(registry.variant_groups().len(), 1);
    }

    #[test]
    fn test_toggle_unknown_group() {
        let mut registry = OptionRegistry::new(&catalogue());
        assert_eq!(
            registry.toggle_group("density"),
            Err(OptionError::UnknownGroup("density".to_string()))
        );
    }

    #[test]
    fn test_add_value_trims_and_ignores_duplicates() {
        let mut registry = OptionRegistry::new(&catalogue());
        assert!(registry.add_value(&length(), "  14\" ").unwrap());
        assert!(!registry.add_value(&length(), "14\"").unwrap());
        assert!(!registry.add_value(&length(), "   ").unwrap());
        assert_eq!(
            registry.group(&length()).unwrap().labels(),
            vec!["10\"", "12\"", "14\""]
        );
    }

    #[test]
    fn test_add_value_is_case_sensitive() {
        let mut registry = OptionRegistry::new(&catalogue());
        let lace = GroupKey::predefined("lace_type");
        assert!(registry.add_value(&lace, "hd lace").unwrap());
        assert_eq!(registry.group(&lace).unwrap().values().len(), 3);
    }

    #[test]
    fn test_text_value_rejected_by_color_group() {
        let mut registry = OptionRegistry::new(&catalogue());
        let result = registry.add_value(&GroupKey::predefined("color"), "Red");
        assert!(matches!(result, Err(OptionError::KindMismatch { kind: "text", .. })));
    }

    #[test]
    fn test_swatches_unique_by_color() {
        let mut registry = OptionRegistry::new(&catalogue());
        let color = GroupKey::predefined("color");
        assert!(registry.add_swatch(&color, "Jet Black", "#000000").unwrap());
        assert!(!registry.add_swatch(&color, "Midnight", "#000").unwrap());
        assert!(!registry.add_swatch(&color, "Jet Black", "#111111").unwrap());
        assert!(registry.add_swatch(&color, "", "#8B4513").unwrap());

        assert_eq!(
            registry.group(&color).unwrap().labels(),
            vec!["Jet Black", "#8b4513"]
        );
    }

    #[test]
    fn test_swatch_rejected_by_text_group() {
        let mut registry = OptionRegistry::new(&catalogue());
        let result = registry.add_swatch(&length(), "Red", "#ff0000");
        assert!(matches!(result, Err(OptionError::KindMismatch { kind: "color", .. })));
    }

    #[test]
    fn test_remove_value() {
        let mut registry = OptionRegistry::new(&catalogue());
        assert!(registry.remove_value(&length(), "10\"").unwrap());
        assert!(!registry.remove_value(&length(), "10\"").unwrap());
        assert_eq!(registry.group(&length()).unwrap().labels(), vec!["12\""]);
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut registry = OptionRegistry::new(&catalogue());
        registry.remove_value(&length(), "10\"").unwrap();
        registry.add_value(&length(), "30\"").unwrap();
        registry.reset_to_defaults("length").unwrap();
        assert_eq!(registry.group(&length()).unwrap().labels(), vec!["10\"", "12\""]);

        assert_eq!(
            registry.reset_to_defaults("color"),
            Err(OptionError::NoDefaults("color".to_string()))
        );
    }

    #[test]
    fn test_custom_groups() {
        let mut registry = OptionRegistry::new(&catalogue());
        assert!(registry.create_group(" Scent "));
        assert!(!registry.create_group("Scent"));
        assert!(!registry.create_group(""));
        assert!(registry.create_group("scent"));

        let scent = GroupKey::custom("Scent");
        registry.add_value(&scent, "Vanilla").unwrap();
        registry.set_participates_in_variants(&scent, true).unwrap();
        assert_eq!(registry.variant_groups().len(), 1);

        assert!(registry.delete_group("Scent"));
        assert!(!registry.delete_group("Scent"));
        assert!(registry.variant_groups().is_empty());
        assert_eq!(registry.custom().len(), 1);
    }

    #[test]
    fn test_variant_groups_order_and_filters() {
        let mut registry = OptionRegistry::new(&catalogue());
        let color = GroupKey::predefined("color");
        registry.toggle_group("color").unwrap();
        registry.toggle_group("length").unwrap();
        registry.toggle_group("lace_type").unwrap();
        registry.set_participates_in_variants(&color, true).unwrap();

        // Color has no values yet, lace type does not generate variants
        let names: Vec<String> = registry
            .variant_groups()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Length"]);

        registry.add_swatch(&color, "Red", "#ff0000").unwrap();
        registry.create_group("Material");
        registry
            .set_participates_in_variants(&GroupKey::custom("Material"), true)
            .unwrap();
        registry.add_value(&GroupKey::custom("Material"), "Silk").unwrap();

        let groups = registry.variant_groups();
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Color", "Length", "Material"]);
        assert_eq!(groups[0].values, vec!["Red"]);
    }

    #[test]
    fn test_is_customized() {
        let mut registry = OptionRegistry::new(&catalogue());
        assert!(registry.predefined().iter().all(|p| !p.is_customized()));

        registry.add_value(&GroupKey::predefined("lace_type"), "Glueless").unwrap();
        let lace = registry
            .predefined()
            .iter()
            .find(|p| p.key() == "lace_type")
            .unwrap();
        assert!(!lace.is_enabled());
        assert!(lace.is_customized());
    }
}
