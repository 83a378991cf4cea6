use std::fmt;

use serde::{Deserialize, Serialize};

/// One variant combination: an ordered tuple holding one value per
/// variant-generating group.
///
/// The tuple is its own lookup key. Values may contain any character,
/// including the `" / "` used for display names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantKey(Vec<String>);

impl VariantKey {
    #[must_use]
    pub const fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human-readable name, e.g. `Red / 10"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0.join(" / ")
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl<S: Into<String>> FromIterator<S> for VariantKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
