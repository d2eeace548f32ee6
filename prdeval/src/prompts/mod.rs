//! Prompt Template System
//!
//! Loads the JSON prompt catalog and renders its `{{placeholder}}` templates.
//!
//! Catalog loading chain:
//! 1. `--prompts <path>`
//! 2. `prompts-file` in config
//! 3. `./prompts.json`
//! 4. Embedded fallback in code
//!
//! Templates use Handlebars syntax in strict mode.

mod catalog;
pub mod embedded;
mod error;
mod manager;

pub use catalog::{
    CONTENT_EVALUATION, CONTENT_GENERATION, EvaluationPrompts, GenerationPrompts, PromptCatalog, PromptTemplate,
};
pub use error::PromptError;
pub use manager::{
    CatalogSource, ENRICH_TASK, EVALUATE_CONTENT, EnrichTaskContext, EvaluateContentContext, PromptManager,
};
