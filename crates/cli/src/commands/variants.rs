//! Variant grid preview.
//!
//! Applies a form file to an empty product and prints the variant grid the
//! editor would show, without touching any storage.
//!
//! ```bash
//! catalog-cli variants preview product.yaml
//! catalog-cli variants preview product.yaml --json
//! ```

use std::path::Path;

use catalog_admin::{AdminConfig, ProductForm, load_catalogue};
use catalog_core::{ProductOptions, Variant};

use crate::form_file::FormFile;

/// Print the variant grid for a form file.
///
/// # Errors
///
/// Returns an error if configuration, the catalogue or the form file cannot
/// be loaded, or the form file is rejected.
pub async fn preview(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let catalogue = load_catalogue(config.option_catalogue.as_deref()).await?;
    let file = FormFile::load(path).await?;

    let mut form = ProductForm::new(&catalogue, &config);
    file.apply(&mut form)?;
    let options = form.options();
    let variants = options.variants();

    tracing::info!(
        variants = variants.len(),
        orphans = options.orphaned_keys().len(),
        "Built variant grid"
    );

    let output = if json {
        serde_json::to_string_pretty(&variants)?
    } else {
        render_grid(options, &variants, &form.draft().stock).join("\n")
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

/// Text rendering of the grid, one line per row plus a header and total.
fn render_grid(options: &ProductOptions, variants: &[Variant], base_stock: &str) -> Vec<String> {
    if variants.is_empty() {
        return vec![format!(
            "No variants. Price {}, stock {}.",
            display_or_dash(options.base_price()),
            options.stock_quantity(base_stock)
        )];
    }

    let names: Vec<String> = variants.iter().map(|v| v.key.display_name()).collect();
    let width = names
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or_default()
        .max("Variant".len());

    let mut lines = Vec::with_capacity(variants.len() + 2);
    lines.push(format!("{:<width$}  {:>10}  {:>6}  SKU", "Variant", "Price", "Stock"));
    for (name, variant) in names.iter().zip(variants) {
        lines.push(format!(
            "{name:<width$}  {:>10}  {:>6}  {}",
            display_or_dash(&variant.price),
            display_or_dash(&variant.stock),
            display_or_dash(&variant.sku),
        ));
    }
    lines.push(format!(
        "{} variants, total stock {}",
        variants.len(),
        options.total_stock()
    ));
    lines
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}
