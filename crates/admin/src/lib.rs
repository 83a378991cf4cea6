//! Catalog Admin - Product editor backend.
//!
//! Wires the pure option and variant model from `catalog-core` to its
//! collaborators:
//! - the option catalogue (YAML)
//! - category and product storage (`PostgreSQL`, or in memory)
//! - media object storage (HTTP, or in memory)
//!
//! # Architecture
//!
//! Collaborators are traits ([`db::CategorySource`], [`db::ProductStore`],
//! [`storage::ObjectStorage`]) so the [`services::ProductForm`] session runs
//! the same against a live database and against in-memory fakes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalogue;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod storage;

pub use catalogue::{CatalogueError, default_catalogue, load_catalogue};
pub use config::{AdminConfig, ConfigError, StorageConfig};
pub use error::AppError;
pub use services::{FormMode, ProductForm, SaveOutcome};
