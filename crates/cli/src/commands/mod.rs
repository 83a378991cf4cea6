//! CLI subcommand implementations.

pub mod migrate;
pub mod product;
pub mod tools;
pub mod variants;
