//! URL slugs.

/// Derive a URL slug from a product name.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen, and trims hyphens from both ends.
///
/// ```
/// use catalog_core::slugify;
///
/// assert_eq!(slugify("Deep Wave 14\" Wig!"), "deep-wave-14-wig");
/// ```
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
