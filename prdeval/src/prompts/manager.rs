//! Prompt Manager
//!
//! Loads the prompt catalog from a file or falls back to the embedded default,
//! and renders user templates with Handlebars.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::catalog::{CONTENT_EVALUATION, CONTENT_GENERATION, PromptCatalog};
use super::{PromptError, embedded};
use crate::domain::{NO_ORIGINAL_TASK, TaskInfo};

/// Template name for task enrichment
pub const ENRICH_TASK: &str = "enrich_task";

/// Template name for PRD evaluation
pub const EVALUATE_CONTENT: &str = "evaluate_content";

/// Catalog file picked up from the working directory
const LOCAL_CATALOG: &str = "prompts.json";

/// Where the active catalog came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Inline,
    Embedded,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Inline => write!(f, "<inline>"),
            CatalogSource::Embedded => write!(f, "<embedded>"),
        }
    }
}

/// Context for the `enrich_task` template
#[derive(Debug, Clone, Serialize)]
pub struct EnrichTaskContext {
    pub task_title: String,
    pub task_description: String,
    pub parent_info: String,
}

impl From<&TaskInfo> for EnrichTaskContext {
    fn from(task: &TaskInfo) -> Self {
        Self {
            task_title: task.title.clone(),
            task_description: task.description.clone(),
            parent_info: task.parent_info(),
        }
    }
}

/// Context for the `evaluate_content` template
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateContentContext {
    pub prd_content: String,
    pub original_task: String,
}

/// Loads and renders prompt templates
pub struct PromptManager {
    catalog: PromptCatalog,
    source: CatalogSource,
    /// Strict so an unfilled placeholder fails instead of rendering empty
    hbs: Handlebars<'static>,
}

impl PromptManager {
    fn with_catalog(catalog: PromptCatalog, source: CatalogSource) -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        // Prompts are plain text; HTML escaping would mangle quotes and brackets
        hbs.register_escape_fn(handlebars::no_escape);
        Self { catalog, source, hbs }
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self, PromptError> {
        debug!(json_len = json.len(), "PromptManager::from_json: called");
        let catalog: PromptCatalog = serde_json::from_str(json)?;
        Ok(Self::with_catalog(catalog, CatalogSource::Inline))
    }

    /// Load a catalog file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = path.as_ref();
        debug!(?path, "PromptManager::from_file: called");
        let content = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: PromptCatalog = serde_json::from_str(&content)?;
        info!("Loaded prompt catalog from: {}", path.display());
        Ok(Self::with_catalog(catalog, CatalogSource::File(path.to_path_buf())))
    }

    /// The catalog compiled into the binary
    pub fn embedded() -> Self {
        debug!("PromptManager::embedded: called");
        // The embedded catalog is checked by the embedded module's tests
        let catalog = serde_json::from_str(embedded::DEFAULT_CATALOG).unwrap_or_default();
        Self::with_catalog(catalog, CatalogSource::Embedded)
    }

    /// Load the catalog with fallback chain
    ///
    /// 1. Explicit `--prompts` path
    /// 2. `prompts-file` from config
    /// 3. `./prompts.json`
    /// 4. Embedded default
    pub fn load(explicit: Option<&Path>, configured: Option<&Path>) -> Result<Self, PromptError> {
        debug!(?explicit, ?configured, "PromptManager::load: called");
        if let Some(path) = explicit.or(configured) {
            return Self::from_file(path);
        }

        let local = Path::new(LOCAL_CATALOG);
        if local.exists() {
            debug!("PromptManager::load: found prompts.json in working directory");
            return Self::from_file(local);
        }

        info!("No prompt catalog found, using embedded default");
        Ok(Self::embedded())
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    /// System prompt for a generation type and style, e.g. `("enrich_task", "concise")`
    pub fn generation_system_prompt(&self, prompt_type: &str, style: &str) -> Result<String, PromptError> {
        debug!(%prompt_type, %style, "PromptManager::generation_system_prompt: called");
        let generation = self
            .catalog
            .content_generation
            .as_ref()
            .ok_or_else(|| PromptError::MissingCategory(CONTENT_GENERATION.to_string()))?;

        let styles = generation
            .system_prompts
            .get(prompt_type)
            .ok_or_else(|| PromptError::MissingTemplate {
                category: CONTENT_GENERATION.to_string(),
                name: prompt_type.to_string(),
            })?;

        let prompt = styles.get(style).ok_or_else(|| PromptError::MissingStyle {
            prompt_type: prompt_type.to_string(),
            style: style.to_string(),
        })?;

        non_empty(prompt.clone(), &format!("{}.{}.{}", CONTENT_GENERATION, prompt_type, style))
    }

    /// System prompt for evaluation
    pub fn evaluation_system_prompt(&self) -> Result<String, PromptError> {
        debug!("PromptManager::evaluation_system_prompt: called");
        let evaluation = self
            .catalog
            .content_evaluation
            .as_ref()
            .ok_or_else(|| PromptError::MissingCategory(CONTENT_EVALUATION.to_string()))?;

        non_empty(
            evaluation.system_prompt.clone(),
            &format!("{}.system_prompt", CONTENT_EVALUATION),
        )
    }

    /// Render a user template from a category with the given context
    pub fn user_prompt<T: Serialize>(
        &self,
        category: &str,
        template_name: &str,
        context: &T,
    ) -> Result<String, PromptError> {
        debug!(%category, %template_name, "PromptManager::user_prompt: called");
        let templates = self
            .catalog
            .user_templates(category)
            .ok_or_else(|| PromptError::MissingCategory(category.to_string()))?;

        let template = templates
            .get(template_name)
            .ok_or_else(|| PromptError::MissingTemplate {
                category: category.to_string(),
                name: template_name.to_string(),
            })?;

        let qualified = format!("{}.{}", category, template_name);
        let rendered = self
            .hbs
            .render_template(&template.template, context)
            .map_err(|e| PromptError::Render {
                template: qualified.clone(),
                message: e.to_string(),
            })?;

        non_empty(rendered, &qualified)
    }

    /// Generation user prompt of `prompt_type` rendered from a task
    ///
    /// Fails on a blank required task field before rendering.
    pub fn generation_user_prompt(&self, prompt_type: &str, task: &TaskInfo) -> Result<String, PromptError> {
        debug!(%prompt_type, title = %task.title, has_parent = task.parent.is_some(), "PromptManager::generation_user_prompt: called");
        if let Some(field) = task.missing_field() {
            return Err(PromptError::MissingField(field.to_string()));
        }
        self.user_prompt(CONTENT_GENERATION, prompt_type, &EnrichTaskContext::from(task))
    }

    /// User prompt asking for a task to be enriched into a PRD
    pub fn enrich_task_prompt(&self, task: &TaskInfo) -> Result<String, PromptError> {
        self.generation_user_prompt(ENRICH_TASK, task)
    }

    /// User prompt asking for a PRD to be scored
    ///
    /// `original_task` defaults to a fixed notice when the task is unknown.
    pub fn evaluate_content_prompt(&self, content: &str, original_task: Option<&str>) -> Result<String, PromptError> {
        debug!(content_len = content.len(), has_task = original_task.is_some(), "PromptManager::evaluate_content_prompt: called");
        if content.trim().is_empty() {
            return Err(PromptError::MissingField("prd_content".to_string()));
        }
        let original_task = original_task
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(NO_ORIGINAL_TASK);

        let context = EvaluateContentContext {
            prd_content: content.to_string(),
            original_task: original_task.to_string(),
        };
        self.user_prompt(CONTENT_EVALUATION, EVALUATE_CONTENT, &context)
    }

    /// Generation prompt types in the catalog
    pub fn prompt_types(&self) -> Vec<String> {
        self.catalog
            .content_generation
            .as_ref()
            .map(|g| g.system_prompts.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Styles available for a generation prompt type
    pub fn styles(&self, prompt_type: &str) -> Vec<String> {
        self.catalog
            .content_generation
            .as_ref()
            .and_then(|g| g.system_prompts.get(prompt_type))
            .map(|styles| styles.keys().cloned().collect())
            .unwrap_or_default()
    }
}

fn non_empty(prompt: String, template: &str) -> Result<String, PromptError> {
    if prompt.trim().is_empty() {
        debug!(%template, "non_empty: prompt is blank");
        return Err(PromptError::EmptyPrompt {
            template: template.to_string(),
        });
    }
    Ok(prompt)
}
