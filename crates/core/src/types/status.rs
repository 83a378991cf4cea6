//! Product listing status.

use serde::{Deserialize, Serialize};

/// Publication status of a product listing.
///
/// Stored lowercase (`active`, `draft`, `archived`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Visible in the shop.
    #[default]
    Active,
    /// Work in progress, hidden from the shop.
    Draft,
    /// Retired listing.
    Archived,
}

impl ProductStatus {
    /// The stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    /// Accepts the stored form as well as the form's title-case labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "draft" => Ok(Self::Draft),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("Active".parse::<ProductStatus>().unwrap(), ProductStatus::Active);
        assert_eq!("DRAFT".parse::<ProductStatus>().unwrap(), ProductStatus::Draft);
        assert!("deleted".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ProductStatus::Archived).unwrap();
        assert_eq!(json, "\"archived\"");
        assert_eq!(ProductStatus::Archived.to_string(), "archived");
    }
}
