//! Fixtures shared by unit tests.

use crate::options::{OptionCatalogue, OptionGroupDef, OptionKind};

fn def(
    key: &str,
    label: &str,
    kind: OptionKind,
    defaults: &[&str],
    generates: bool,
) -> OptionGroupDef {
    OptionGroupDef {
        key: key.to_string(),
        label: label.to_string(),
        kind,
        default_values: defaults.iter().map(ToString::to_string).collect(),
        generates_variants: generates,
    }
}

/// A small wig catalogue: color swatches, lace type, length.
#[allow(clippy::unwrap_used)]
pub fn catalogue() -> OptionCatalogue {
    OptionCatalogue::new(vec![
        def("color", "Color", OptionKind::Color, &[], false),
        def("lace_type", "Lace Type", OptionKind::Values, &["HD Lace", "Transparent Lace"], false),
        def("length", "Length", OptionKind::Values, &["10\"", "12\""], true),
    ])
    .unwrap()
}
