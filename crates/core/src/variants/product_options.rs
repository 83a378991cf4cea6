//! Option groups and variant overrides of one product, kept in sync.

use serde::{Deserialize, Serialize};

use super::{OverrideStore, VariantField, VariantKey, VariantOverride, generate_combinations};
use crate::options::{GroupKey, OptionCatalogue, OptionError, OptionRegistry};
use crate::types::parse_quantity;

/// What happens to overrides whose combination disappears.
///
/// A combination disappears when a value is removed or a group is switched
/// off or stops generating variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Keep the data; it reappears if the same combination comes back.
    #[default]
    Retain,
    /// Drop the data as soon as the combination disappears.
    Discard,
}

/// A resolved variant row, as shown in the price/stock grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub key: VariantKey,
    pub price: String,
    pub stock: String,
    pub sku: String,
}

/// The option registry and override store of one product.
///
/// Every operation that can change the combination set goes through this
/// type so the orphan policy is applied consistently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOptions {
    registry: OptionRegistry,
    overrides: OverrideStore,
    base_price: String,
    policy: OrphanPolicy,
}

impl ProductOptions {
    /// Fresh options for a new product.
    #[must_use]
    pub fn new(catalogue: &OptionCatalogue) -> Self {
        Self::from_registry(OptionRegistry::new(catalogue))
    }

    /// Wrap an existing registry with an empty override store.
    #[must_use]
    pub fn from_registry(registry: OptionRegistry) -> Self {
        Self {
            registry,
            overrides: OverrideStore::new(),
            base_price: String::new(),
            policy: OrphanPolicy::default(),
        }
    }

    /// Use a different orphan policy, applying it immediately.
    #[must_use]
    pub fn with_policy(mut self, policy: OrphanPolicy) -> Self {
        self.set_policy(policy);
        self
    }

    /// Switch the orphan policy, applying it immediately.
    pub fn set_policy(&mut self, policy: OrphanPolicy) {
        self.policy = policy;
        self.apply_policy();
    }

    #[must_use]
    pub const fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    #[must_use]
    pub const fn policy(&self) -> OrphanPolicy {
        self.policy
    }

    /// Base product price as typed; the fallback price of every variant.
    #[must_use]
    pub fn base_price(&self) -> &str {
        &self.base_price
    }

    pub fn set_base_price(&mut self, price: impl Into<String>) {
        self.base_price = price.into();
    }

    // -------------------------------------------------------------------------
    // Registry operations
    // -------------------------------------------------------------------------

    /// See [`OptionRegistry::toggle_group`].
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownGroup`] if the key is not in the catalogue.
    pub fn toggle_group(&mut self, key: &str) -> Result<bool, OptionError> {
        let enabled = self.registry.toggle_group(key)?;
        self.apply_policy();
        Ok(enabled)
    }

    /// See [`OptionRegistry::set_participates_in_variants`].
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownGroup`] if the group does not exist.
    pub fn set_participates_in_variants(
        &mut self,
        key: &GroupKey,
        participates: bool,
    ) -> Result<(), OptionError> {
        self.registry.set_participates_in_variants(key, participates)?;
        self.apply_policy();
        Ok(())
    }

    /// See [`OptionRegistry::add_value`].
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist or is a color group.
    pub fn add_value(&mut self, key: &GroupKey, value: &str) -> Result<bool, OptionError> {
        let added = self.registry.add_value(key, value)?;
        self.apply_policy();
        Ok(added)
    }

    /// See [`OptionRegistry::add_swatch`].
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist, is not a color group, or
    /// the color is invalid.
    pub fn add_swatch(
        &mut self,
        key: &GroupKey,
        label: &str,
        color: &str,
    ) -> Result<bool, OptionError> {
        let added = self.registry.add_swatch(key, label, color)?;
        self.apply_policy();
        Ok(added)
    }

    /// See [`OptionRegistry::remove_value`].
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownGroup`] if the group does not exist.
    pub fn remove_value(&mut self, key: &GroupKey, value: &str) -> Result<bool, OptionError> {
        let removed = self.registry.remove_value(key, value)?;
        self.apply_policy();
        Ok(removed)
    }

    /// See [`OptionRegistry::reset_to_defaults`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the group has no defaults.
    pub fn reset_to_defaults(&mut self, key: &str) -> Result<(), OptionError> {
        self.registry.reset_to_defaults(key)?;
        self.apply_policy();
        Ok(())
    }

    /// See [`OptionRegistry::create_group`].
    pub fn create_group(&mut self, name: &str) -> bool {
        self.registry.create_group(name)
    }

    /// Delete a custom group together with the overrides of every
    /// combination it contributed to.
    ///
    /// Orphans retained from earlier edits are not affected.
    pub fn delete_group(&mut self, name: &str) -> bool {
        let before = self.combinations();
        if !self.registry.delete_group(name) {
            return false;
        }
        let after = self.combinations();
        for key in before.iter().filter(|key| !after.contains(key)) {
            self.overrides.remove(key);
        }
        self.apply_policy();
        true
    }

    // -------------------------------------------------------------------------
    // Combinations and overrides
    // -------------------------------------------------------------------------

    /// The current combination set, in grid order.
    #[must_use]
    pub fn combinations(&self) -> Vec<VariantKey> {
        generate_combinations(&self.registry.variant_groups())
    }

    /// Whether the product sells as variants rather than a single item.
    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.combinations().is_empty()
    }

    /// The resolved variant rows, in grid order.
    #[must_use]
    pub fn variants(&self) -> Vec<Variant> {
        self.combinations()
            .into_iter()
            .map(|key| {
                let resolved = self.overrides.get(&key, &self.base_price);
                Variant {
                    key,
                    price: resolved.price.unwrap_or_default(),
                    stock: resolved.stock.unwrap_or_default(),
                    sku: resolved.sku.unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Stored override for `key`, resolved, or the fallback.
    #[must_use]
    pub fn get_override(&self, key: &VariantKey) -> VariantOverride {
        self.overrides.get(key, &self.base_price)
    }

    /// Upsert one field of one combination's override.
    pub fn set_field(&mut self, key: VariantKey, field: VariantField, value: impl Into<String>) {
        self.overrides.set_field(key, field, value, &self.base_price);
    }

    /// Store a whole override for `key`.
    pub fn insert_override(&mut self, key: VariantKey, value: VariantOverride) {
        self.overrides.insert(key, value);
    }

    /// Set one field on every current combination. Returns the number of rows.
    pub fn bulk_set(&mut self, field: VariantField, value: &str) -> usize {
        let keys = self.combinations();
        self.overrides.bulk_set(&keys, field, value, &self.base_price)
    }

    /// Sum of the stock of every current combination.
    #[must_use]
    pub fn total_stock(&self) -> i64 {
        self.variants()
            .iter()
            .map(|variant| parse_quantity(&variant.stock))
            .fold(0, i64::saturating_add)
    }

    /// Product stock: the variant total when variants exist, else `base_stock`.
    #[must_use]
    pub fn stock_quantity(&self, base_stock: &str) -> i64 {
        if self.has_variants() {
            self.total_stock()
        } else {
            parse_quantity(base_stock)
        }
    }

    /// Stored overrides whose combination does not currently exist.
    #[must_use]
    pub fn orphaned_keys(&self) -> Vec<VariantKey> {
        let live = self.combinations();
        self.overrides
            .keys()
            .filter(|key| !live.contains(key))
            .cloned()
            .collect()
    }

    /// Drop every orphaned override regardless of policy. Returns how many.
    pub fn prune_orphans(&mut self) -> usize {
        let live = self.combinations();
        let before = self.overrides.len();
        self.overrides.retain(|key| live.contains(key));
        before - self.overrides.len()
    }

    fn apply_policy(&mut self) {
        if self.policy == OrphanPolicy::Discard {
            self.prune_orphans();
        }
    }
}
