//! The combination engine.

use serde::{Deserialize, Serialize};

use super::VariantKey;

/// A variant-generating group reduced to its name and value labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub name: String,
    pub values: Vec<String>,
}

impl VariantGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Cartesian product of the groups' values, last group varying fastest.
///
/// No groups means no variants: the product is sold as a single simple
/// product, so the result is empty rather than one empty tuple.
#[must_use]
pub fn generate_combinations(groups: &[VariantGroup]) -> Vec<VariantKey> {
    if groups.is_empty() {
        return Vec::new();
    }

    let mut tuples: Vec<Vec<String>> = vec![Vec::new()];
    for group in groups {
        tuples = tuples
            .into_iter()
            .flat_map(move |prefix| {
                group.values.iter().map(move |value| {
                    let mut tuple = prefix.clone();
                    tuple.push(value.clone());
                    tuple
                })
            })
            .collect();
    }

    tuples.into_iter().map(VariantKey::new).collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn group(name: &str, values: &[&str]) -> VariantGroup {
        VariantGroup::new(name, values.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_color_by_length() {
        let groups = [group("Color", &["Red", "Blue"]), group("Length", &["10\"", "12\""])];
        let names: Vec<String> = generate_combinations(&groups)
            .iter()
            .map(VariantKey::display_name)
            .collect();
        assert_eq!(
            names,
            vec!["Red / 10\"", "Red / 12\"", "Blue / 10\"", "Blue / 12\""]
        );
    }

    #[test]
    fn test_no_groups_no_combinations() {
        assert!(generate_combinations(&[]).is_empty());
    }

    #[test]
    fn test_empty_group_empties_product() {
        let groups = [group("Color", &["Red"]), group("Length", &[])];
        assert!(generate_combinations(&groups).is_empty());
    }

    #[test]
    fn test_adding_a_value_appends_without_reshuffling() {
        let before = generate_combinations(&[group("Color", &["Red"]), group("Length", &["10\""])]);
        let after = generate_combinations(&[
            group("Color", &["Red", "Blue"]),
            group("Length", &["10\""]),
        ]);
        assert_eq!(after[..before.len()], before[..]);
    }

    proptest! {
        #[test]
        fn prop_count_is_product_of_sizes(sizes in prop::collection::vec(1usize..5, 0..4)) {
            let groups: Vec<VariantGroup> = sizes
                .iter()
                .enumerate()
                .map(|(g, n)| VariantGroup::new(
                    format!("g{g}"),
                    (0..*n).map(|v| format!("v{v}")).collect(),
                ))
                .collect();

            let combinations = generate_combinations(&groups);
            let expected: usize = if sizes.is_empty() { 0 } else { sizes.iter().product() };
            prop_assert_eq!(combinations.len(), expected);

            let unique: std::collections::HashSet<_> = combinations.iter().collect();
            prop_assert_eq!(unique.len(), combinations.len());
            prop_assert!(combinations.iter().all(|c| c.len() == sizes.len()));
        }

        #[test]
        fn prop_deterministic(sizes in prop::collection::vec(1usize..4, 1..4)) {
            let groups: Vec<VariantGroup> = sizes
                .iter()
                .map(|n| VariantGroup::new("g", (0..*n).map(|v| v.to_string()).collect()))
                .collect();
            prop_assert_eq!(generate_combinations(&groups), generate_combinations(&groups));
        }
    }
}
