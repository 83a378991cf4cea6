//! Errors raised by option group operations.

use thiserror::Error;

/// Errors that can occur when editing option groups.
///
/// Duplicate or blank input is not an error: those operations report `false`
/// and leave the registry unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// No predefined or custom group with this key.
    #[error("unknown option group: {0}")]
    UnknownGroup(String),

    /// A text value was given to a color group, or a swatch to a text group.
    #[error("option group {group} does not accept {kind} values")]
    KindMismatch {
        /// Group key or name.
        group: String,
        /// Kind of value that was rejected.
        kind: &'static str,
    },

    /// A color identifier that is not `#rgb` or `#rrggbb`.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The group has no built-in defaults to restore.
    #[error("option group {0} has no default values")]
    NoDefaults(String),

    /// The catalogue defines the same key twice.
    #[error("duplicate option group key in catalogue: {0}")]
    DuplicateKey(String),

    /// A catalogue entry with a blank key or label.
    #[error("option group definition is missing a {0}")]
    MissingField(&'static str),
}
