//! Option values: plain text or color swatches.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::OptionError;

/// A normalized color identifier, always lowercase `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorId(String);

impl ColorId {
    /// Parse `#rgb` or `#rrggbb` (the `#` is optional), case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::InvalidColor`] for anything else.
    pub fn parse(input: &str) -> Result<Self, OptionError> {
        let trimmed = input.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(OptionError::InvalidColor(input.to_string()));
        }

        let hex = hex.to_ascii_lowercase();
        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex,
            _ => return Err(OptionError::InvalidColor(input.to_string())),
        };

        Ok(Self(format!("#{expanded}")))
    }

    /// The `#rrggbb` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ColorId {
    type Error = OptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColorId> for String {
    fn from(color: ColorId) -> Self {
        color.0
    }
}

/// A named color swatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swatch {
    /// Display label, shown in variant names.
    pub label: String,
    /// Color identifier; unique within a group.
    pub color: ColorId,
}

impl Swatch {
    /// Build a swatch, using the color identifier as label when `label` is blank.
    #[must_use]
    pub fn new(label: &str, color: ColorId) -> Self {
        let label = label.trim();
        let label = if label.is_empty() {
            color.to_string()
        } else {
            label.to_string()
        };
        Self { label, color }
    }

    /// Read the `label|#hex` form older product metadata used for colors.
    #[must_use]
    pub fn from_legacy(value: &str) -> Option<Self> {
        let (label, color) = value.split_once('|')?;
        let color = ColorId::parse(color).ok()?;
        Some(Self::new(label, color))
    }
}

/// A single value in an option group.
///
/// Serialized untagged: text values are plain strings, swatches are objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Swatch(Swatch),
}

impl OptionValue {
    /// The string this value contributes to a variant combination.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Swatch(swatch) => &swatch.label,
        }
    }

    /// Whether `needle` names this value (text, swatch label, or swatch color).
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        match self {
            Self::Text(text) => text == needle,
            Self::Swatch(swatch) => swatch.label == needle || swatch.color.as_str() == needle,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
