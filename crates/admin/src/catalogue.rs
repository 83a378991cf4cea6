//! Loading the predefined option catalogue.
//!
//! The built-in catalogue ships as `catalogue/default.yaml`. Deployments can
//! point `CATALOG_OPTION_CATALOGUE` at their own file in the same format.

use std::path::Path;

use catalog_core::{OptionCatalogue, OptionError};
use thiserror::Error;
use tracing::instrument;

const DEFAULT_CATALOGUE: &str = include_str!("catalogue/default.yaml");

/// Errors that can occur while loading an option catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Failed to read the catalogue file.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The file is not valid catalogue YAML.
    #[error("failed to parse catalogue: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The catalogue parsed but is inconsistent.
    #[error("invalid catalogue: {0}")]
    Invalid(#[from] OptionError),
}

/// Parse a catalogue from YAML text.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a group key is blank or
/// repeated.
pub fn parse_catalogue(yaml: &str) -> Result<OptionCatalogue, CatalogueError> {
    let catalogue: OptionCatalogue = serde_yaml::from_str(yaml)?;
    catalogue.validate()?;
    Ok(catalogue)
}

/// The built-in catalogue.
///
/// # Errors
///
/// Returns an error only if the bundled YAML is broken.
pub fn default_catalogue() -> Result<OptionCatalogue, CatalogueError> {
    parse_catalogue(DEFAULT_CATALOGUE)
}

/// Load a catalogue from `path`, or the built-in one when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
#[instrument]
pub async fn load_catalogue(path: Option<&Path>) -> Result<OptionCatalogue, CatalogueError> {
    let Some(path) = path else {
        return default_catalogue();
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogueError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let catalogue = parse_catalogue(&content)?;
    tracing::info!(groups = catalogue.len(), "Loaded option catalogue");
    Ok(catalogue)
}
