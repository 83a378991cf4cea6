//! Diffing stored variant rows against freshly projected ones.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use super::{VariantKey, VariantRecord};
use crate::types::VariantId;

/// A variant row as it exists in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredVariant {
    pub id: VariantId,
    pub record: VariantRecord,
}

/// Writes needed to bring stored variant rows in line with the projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantChangeSet {
    /// Combinations with no stored row.
    pub inserts: Vec<VariantRecord>,
    /// Stored rows whose data changed, carrying the new data.
    pub updates: Vec<StoredVariant>,
    /// Stored rows whose combination no longer exists.
    pub deletes: Vec<VariantId>,
}

impl VariantChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Total number of row writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len() + self.deletes.len()
    }
}

/// Match stored rows to desired rows by combination.
///
/// Rows are matched on [`VariantRecord::key`], so a row keeps its ID for as
/// long as its combination exists. When several stored rows share a
/// combination, the first is kept and the rest are deleted.
#[must_use]
pub fn reconcile(existing: &[StoredVariant], desired: &[VariantRecord]) -> VariantChangeSet {
    let mut changes = VariantChangeSet::default();
    let mut stored_by_key: HashMap<VariantKey, &StoredVariant> = HashMap::new();

    for stored in existing {
        match stored_by_key.entry(stored.record.key()) {
            Entry::Vacant(slot) => {
                slot.insert(stored);
            }
            Entry::Occupied(_) => changes.deletes.push(stored.id),
        }
    }

    for record in desired {
        match stored_by_key.remove(&record.key()) {
            Some(stored) if stored.record == *record => {}
            Some(stored) => changes.updates.push(StoredVariant {
                id: stored.id,
                record: record.clone(),
            }),
            None => changes.inserts.push(record.clone()),
        }
    }

    changes
        .deletes
        .extend(stored_by_key.into_values().map(|stored| stored.id));
    changes.deletes.sort();

    changes
}
