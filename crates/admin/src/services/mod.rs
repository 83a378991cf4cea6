//! Business logic services for admin.
//!
//! # Services
//!
//! - `product_form` - Product editor session: options, media, save

pub mod product_form;

pub use product_form::{FormMode, PRODUCTS_PATH, ProductForm, SaveOutcome, VariantWrites};
