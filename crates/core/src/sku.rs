//! SKU generation.
//!
//! Generated SKUs look like `WIG-K3F9-7QXA`: the configured prefix, the last
//! four base-36 digits of the current Unix time in milliseconds, and four
//! random base-36 digits, all uppercase.

use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 4;

/// Prefix used when none is configured.
pub const DEFAULT_SKU_PREFIX: &str = "SKU";

/// Generates product SKUs with a fixed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuGenerator {
    prefix: String,
}

impl Default for SkuGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SKU_PREFIX)
    }
}

impl SkuGenerator {
    /// A generator for `prefix`; a blank prefix falls back to `SKU`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix.trim();
        let prefix = if prefix.is_empty() {
            DEFAULT_SKU_PREFIX
        } else {
            prefix
        };
        Self {
            prefix: prefix.to_uppercase(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate a SKU from the current time and thread-local randomness.
    #[must_use]
    pub fn generate(&self) -> String {
        self.generate_at(Utc::now(), &mut rand::rng())
    }

    /// Generate a SKU from an explicit time and random source.
    #[must_use]
    pub fn generate_at<R: Rng + ?Sized>(&self, now: DateTime<Utc>, rng: &mut R) -> String {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let time = to_base36(millis);
        let time_suffix = time
            .get(time.len().saturating_sub(SUFFIX_LEN)..)
            .unwrap_or(&time);

        let random: String = (0..SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
            .collect();

        format!("{}-{time_suffix}-{random}", self.prefix).to_uppercase()
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        // value % 36 < 36, always in bounds
        #[allow(clippy::indexing_slicing, clippy::cast_possible_truncation)]
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
