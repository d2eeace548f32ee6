//! Embedded prompts
//!
//! The default catalog is compiled into the binary from `prompts/prompts.json`.

/// Default prompt catalog
pub const DEFAULT_CATALOG: &str = include_str!("../../prompts/prompts.json");
