//! Core types for the catalog.
//!
//! This module provides type-safe wrappers and small parsers shared by the
//! option model and the admin crate.

pub mod id;
pub mod media;
pub mod numeric;
pub mod status;

pub use id::*;
pub use media::{MediaItem, MediaKind, is_video_url, storage_file_name};
pub use numeric::{
    nonzero_or, parse_leading_decimal, parse_leading_int, parse_price, parse_quantity,
};
pub use status::ProductStatus;
