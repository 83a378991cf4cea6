//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string (required by database commands)
//! - `CATALOG_SKU_PREFIX` - Prefix for generated SKUs (default: SKU)
//! - `CATALOG_OPTION_CATALOGUE` - Path to a YAML option catalogue (default: built-in)
//!
//! ## Optional (object storage - enables media uploads)
//! - `CATALOG_STORAGE_URL` - Storage service base URL
//! - `CATALOG_STORAGE_KEY` - Storage service key
//! - `CATALOG_STORAGE_BUCKET` - Bucket for product media (default: products)

use std::collections::HashMap;
use std::path::PathBuf;

use catalog_core::sku::DEFAULT_SKU_PREFIX;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_STORAGE_BUCKET: &str = "products";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Prefix for generated SKUs
    pub sku_prefix: String,
    /// YAML option catalogue to load instead of the built-in one
    pub option_catalogue: Option<PathBuf>,
    /// Object storage for product media (optional)
    pub storage: Option<StorageConfig>,
}

/// Object storage configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct StorageConfig {
    /// Storage service base URL
    pub base_url: Url,
    /// Bucket holding product media
    pub bucket: String,
    /// Service key sent as a bearer token
    pub service_key: SecretString,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("base_url", &self.base_url.as_str())
            .field("bucket", &self.bucket)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

impl StorageConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let base_url = lookup("CATALOG_STORAGE_URL");
        let service_key = lookup("CATALOG_STORAGE_KEY");

        match (base_url, service_key) {
            (Some(url), Some(key)) => {
                let base_url = Url::parse(&url).map_err(|e| {
                    ConfigError::InvalidEnvVar("CATALOG_STORAGE_URL".to_string(), e.to_string())
                })?;
                validate_secret_strength(&key, "CATALOG_STORAGE_KEY")?;

                Ok(Some(Self {
                    base_url,
                    bucket: lookup("CATALOG_STORAGE_BUCKET")
                        .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string()),
                    service_key: SecretString::from(key),
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "CATALOG_STORAGE_*".to_string(),
                "Both CATALOG_STORAGE_URL and CATALOG_STORAGE_KEY must be set together".to_string(),
            )),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            sku_prefix: DEFAULT_SKU_PREFIX.to_string(),
            option_catalogue: None,
            storage: None,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the storage key
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`AdminConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("CATALOG_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from);
        let sku_prefix =
            lookup("CATALOG_SKU_PREFIX").unwrap_or_else(|| DEFAULT_SKU_PREFIX.to_string());
        let option_catalogue = lookup("CATALOG_OPTION_CATALOGUE").map(PathBuf::from);
        let storage = StorageConfig::from_lookup(&lookup)?;

        Ok(Self {
            database_url,
            sku_prefix,
            option_catalogue,
            storage,
        })
    }

    /// Returns the database URL, for commands that need one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no database URL is configured.
    pub fn database_url(&self) -> Result<&SecretString, ConfigError> {
        self.database_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("CATALOG_DATABASE_URL".to_string()))
    }

    /// Returns the storage configuration, for commands that upload media.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if storage is not configured.
    pub fn storage(&self) -> Result<&StorageConfig, ConfigError> {
        self.storage
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("CATALOG_STORAGE_URL".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
