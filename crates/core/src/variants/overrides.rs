//! Per-variant price, stock and SKU overrides.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::VariantKey;
use crate::types::parse_quantity;

/// An editable field of a variant row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantField {
    Price,
    Stock,
    Sku,
}

impl FromStr for VariantField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            "sku" => Ok(Self::Sku),
            _ => Err(format!("invalid variant field: {s}")),
        }
    }
}

/// Form values entered for one variant.
///
/// Values are kept as typed; a missing or blank field falls back to the
/// product's base price, a stock of `0`, or an empty SKU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl VariantOverride {
    /// The values a variant shows before anything was entered for it.
    #[must_use]
    pub fn fallback(base_price: &str) -> Self {
        Self {
            price: Some(base_price.to_string()),
            stock: Some("0".to_string()),
            sku: Some(String::new()),
        }
    }

    /// Set one field.
    pub fn set(&mut self, field: VariantField, value: impl Into<String>) {
        let slot = match field {
            VariantField::Price => &mut self.price,
            VariantField::Stock => &mut self.stock,
            VariantField::Sku => &mut self.sku,
        };
        *slot = Some(value.into());
    }

    /// Fill blank fields from the fallback.
    #[must_use]
    pub fn resolve(&self, base_price: &str) -> Self {
        fn or_default(value: Option<&String>, default: &str) -> Option<String> {
            Some(
                value
                    .filter(|v| !v.is_empty())
                    .map_or_else(|| default.to_string(), Clone::clone),
            )
        }

        Self {
            price: or_default(self.price.as_ref(), base_price),
            stock: or_default(self.stock.as_ref(), "0"),
            sku: Some(self.sku.clone().unwrap_or_default()),
        }
    }

    /// Resolved price text.
    #[must_use]
    pub fn price_or<'a>(&'a self, base_price: &'a str) -> &'a str {
        self.price.as_deref().filter(|p| !p.is_empty()).unwrap_or(base_price)
    }

    /// Resolved stock, unparsable as zero.
    #[must_use]
    pub fn stock_quantity(&self) -> i64 {
        self.stock.as_deref().map_or(0, parse_quantity)
    }
}

/// Overrides keyed by variant combination.
///
/// The store does not know which combinations currently exist: callers pass
/// the producible keys to the bulk operations, and keys outside that set are
/// left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideStore {
    entries: BTreeMap<VariantKey, VariantOverride>,
}

impl OverrideStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored override, resolved, or the fallback if there is none.
    #[must_use]
    pub fn get(&self, key: &VariantKey, base_price: &str) -> VariantOverride {
        self.entries.get(key).map_or_else(
            || VariantOverride::fallback(base_price),
            |stored| stored.resolve(base_price),
        )
    }

    /// The raw stored override.
    #[must_use]
    pub fn stored(&self, key: &VariantKey) -> Option<&VariantOverride> {
        self.entries.get(key)
    }

    /// Upsert one field, creating the record from the fallback if needed.
    pub fn set_field(
        &mut self,
        key: VariantKey,
        field: VariantField,
        value: impl Into<String>,
        base_price: &str,
    ) {
        self.entries
            .entry(key)
            .or_insert_with(|| VariantOverride::fallback(base_price))
            .set(field, value);
    }

    /// Set one field on every key in `keys`. Returns the number of keys touched.
    pub fn bulk_set<'k, I>(
        &mut self,
        keys: I,
        field: VariantField,
        value: &str,
        base_price: &str,
    ) -> usize
    where
        I: IntoIterator<Item = &'k VariantKey>,
    {
        let mut touched = 0;
        for key in keys {
            self.set_field(key.clone(), field, value, base_price);
            touched += 1;
        }
        touched
    }

    /// Sum of parsed stock over `keys`.
    #[must_use]
    pub fn total_stock<'k, I>(&self, keys: I) -> i64
    where
        I: IntoIterator<Item = &'k VariantKey>,
    {
        keys.into_iter()
            .filter_map(|key| self.entries.get(key))
            .map(VariantOverride::stock_quantity)
            .fold(0, i64::saturating_add)
    }

    /// Store a complete override, replacing any previous one.
    pub fn insert(&mut self, key: VariantKey, value: VariantOverride) {
        self.entries.insert(key, value);
    }

    pub fn remove(&mut self, key: &VariantKey) -> Option<VariantOverride> {
        self.entries.remove(key)
    }

    /// Keep only the overrides whose key satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&VariantKey) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    pub fn keys(&self) -> impl Iterator<Item = &VariantKey> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(values: &[&str]) -> VariantKey {
        values.iter().copied().collect()
    }

    #[test]
    fn test_get_falls_back() {
        let store = OverrideStore::new();
        let value = store.get(&key(&["Red"]), "25.00");
        assert_eq!(value, VariantOverride::fallback("25.00"));
        assert_eq!(value.sku.as_deref(), Some(""));
    }

    #[test]
    fn test_set_field_creates_with_fallback() {
        let mut store = OverrideStore::new();
        store.set_field(key(&["Red"]), VariantField::Sku, "WIG-RED", "25.00");

        let stored = store.stored(&key(&["Red"])).unwrap_or_else(|| panic!("missing"));
        assert_eq!(stored.price.as_deref(), Some("25.00"));
        assert_eq!(stored.stock.as_deref(), Some("0"));
        assert_eq!(stored.sku.as_deref(), Some("WIG-RED"));
    }

    #[test]
    fn test_blank_fields_resolve_to_fallback() {
        let mut store = OverrideStore::new();
        store.insert(
            key(&["Red"]),
            VariantOverride {
                price: Some(String::new()),
                stock: None,
                sku: None,
            },
        );
        let resolved = store.get(&key(&["Red"]), "30");
        assert_eq!(resolved.price.as_deref(), Some("30"));
        assert_eq!(resolved.stock.as_deref(), Some("0"));
    }

    #[test]
    fn test_bulk_set_only_touches_given_keys() {
        let mut store = OverrideStore::new();
        store.set_field(key(&["Green"]), VariantField::Stock, "7", "10");

        let live = [key(&["Red"]), key(&["Blue"])];
        assert_eq!(store.bulk_set(&live, VariantField::Stock, "50", "10"), 2);

        assert_eq!(store.total_stock(&live), 100);
        assert_eq!(store.get(&key(&["Green"]), "10").stock.as_deref(), Some("7"));
    }

    #[test]
    fn test_total_stock_ignores_garbage() {
        let mut store = OverrideStore::new();
        store.set_field(key(&["Red"]), VariantField::Stock, "lots", "10");
        store.set_field(key(&["Blue"]), VariantField::Stock, "4", "10");
        assert_eq!(store.total_stock(&[key(&["Red"]), key(&["Blue"])]), 4);
    }

    #[test]
    fn test_total_stock_saturates() {
        let mut store = OverrideStore::new();
        let keys = [key(&["Red"]), key(&["Blue"])];
        store.bulk_set(&keys, VariantField::Stock, "9223372036854775807", "10");
        assert_eq!(store.total_stock(&keys), i64::MAX);
    }

    #[test]
    fn test_field_parse() {
        assert_eq!("Stock".parse::<VariantField>(), Ok(VariantField::Stock));
        assert!("color".parse::<VariantField>().is_err());
    }
}
