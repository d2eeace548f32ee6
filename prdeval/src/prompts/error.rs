//! Prompt error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or rendering prompts
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt category not found: {0}")]
    MissingCategory(String),

    #[error("Prompt template not found: {category}.{name}")]
    MissingTemplate { category: String, name: String },

    #[error("No '{style}' system prompt for prompt type '{prompt_type}'")]
    MissingStyle { prompt_type: String, style: String },

    #[error("Required field is empty: {0}")]
    MissingField(String),

    #[error("Failed to render template {template}: {message}")]
    Render { template: String, message: String },

    #[error("Template {template} rendered to an empty prompt")]
    EmptyPrompt { template: String },

    #[error("Failed to read prompt catalog {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid prompt catalog: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_template_message() {
        let err = PromptError::MissingTemplate {
            category: "content_generation".to_string(),
            name: "summarize".to_string(),
        };
        assert_eq!(err.to_string(), "Prompt template not found: content_generation.summarize");
    }

    #[test]
    fn test_missing_style_message() {
        let err = PromptError::MissingStyle {
            prompt_type: "enrich_task".to_string(),
            style: "verbose".to_string(),
        };
        assert!(err.to_string().contains("'verbose'"));
        assert!(err.to_string().contains("'enrich_task'"));
    }
}
