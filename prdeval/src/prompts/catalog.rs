//! Prompt catalog file format

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category key for PRD generation prompts
pub const CONTENT_GENERATION: &str = "content_generation";

/// Category key for PRD evaluation prompts
pub const CONTENT_EVALUATION: &str = "content_evaluation";

/// Parsed `prompts.json`
///
/// Either category may be absent; asking for a prompt in a missing
/// category is reported when the prompt is requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_generation: Option<GenerationPrompts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_evaluation: Option<EvaluationPrompts>,
}

/// Generation prompts: system prompts indexed by type then style
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationPrompts {
    /// prompt type -> style -> system prompt
    #[serde(default)]
    pub system_prompts: BTreeMap<String, BTreeMap<String, String>>,

    #[serde(default)]
    pub user_prompt_templates: BTreeMap<String, PromptTemplate>,
}

/// Evaluation prompts: one system prompt and named user templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationPrompts {
    pub system_prompt: String,

    #[serde(default)]
    pub user_prompt_templates: BTreeMap<String, PromptTemplate>,
}

/// A user prompt with `{{placeholder}}` tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub template: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PromptCatalog {
    /// User templates of one category, if the category exists
    pub fn user_templates(&self, category: &str) -> Option<&BTreeMap<String, PromptTemplate>> {
        match category {
            CONTENT_GENERATION => self.content_generation.as_ref().map(|g| &g.user_prompt_templates),
            CONTENT_EVALUATION => self.content_evaluation.as_ref().map(|e| &e.user_prompt_templates),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generation_only_catalog() {
        let catalog: PromptCatalog = serde_json::from_str(
            r#"{
                "content_generation": {
                    "system_prompts": {"enrich_task": {"concise": "Be brief."}},
                    "user_prompt_templates": {"enrich_task": {"template": "{{task_title}}"}}
                }
            }"#,
        )
        .unwrap();

        assert!(catalog.content_evaluation.is_none());
        assert!(catalog.user_templates(CONTENT_EVALUATION).is_none());
        let templates = catalog.user_templates(CONTENT_GENERATION).unwrap();
        assert_eq!(templates["enrich_task"].template, "{{task_title}}");
        assert!(templates["enrich_task"].description.is_none());
    }

    #[test]
    fn test_unknown_category() {
        let catalog = PromptCatalog::default();
        assert!(catalog.user_templates("translation").is_none());
    }

    #[test]
    fn test_evaluation_requires_system_prompt() {
        let result: Result<PromptCatalog, _> =
            serde_json::from_str(r#"{"content_evaluation": {"user_prompt_templates": {}}}"#);
        assert!(result.is_err());
    }
}
