//! Integration tests for the catalog product form.
//!
//! The tests drive [`catalog_admin::ProductForm`] end to end against the
//! in-memory store and object storage, so no database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `product_form` - create, edit, media and failure paths of a save
//! - `variant_grid` - option edits and how overrides follow them
