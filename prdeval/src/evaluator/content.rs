//! Content evaluator
//!
//! Generates a PRD from a task with the generator model, then scores it with
//! the evaluator model. Two sequential calls; any failure is returned as-is.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::{EvalError, parse_evaluation};
use crate::config::ResolvedLlmConfig;
use crate::domain::{EvaluationResult, TaskInfo};
use crate::llm::{CompletionRequest, LlmClient, ResponseFormat, StopReason, TokenUsage};
use crate::prompts::PromptManager;

/// Request limits for the two calls
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorSettings {
    pub generation_max_tokens: u32,
    pub generation_temperature: Option<f32>,
    pub evaluation_max_tokens: u32,
    pub evaluation_temperature: Option<f32>,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            generation_max_tokens: 1000,
            generation_temperature: Some(0.0),
            evaluation_max_tokens: 2000,
            evaluation_temperature: Some(0.0),
        }
    }
}

impl EvaluatorSettings {
    pub fn from_config(generator: &ResolvedLlmConfig, evaluator: &ResolvedLlmConfig) -> Self {
        Self {
            generation_max_tokens: generator.max_tokens,
            generation_temperature: Some(generator.temperature),
            evaluation_max_tokens: evaluator.max_tokens,
            evaluation_temperature: Some(evaluator.temperature),
        }
    }
}

/// A generated PRD
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub prompt_type: String,
    pub style: String,
    pub model: String,
    pub content: String,
    pub usage: TokenUsage,
    /// Generation hit the token limit and the PRD is likely cut off
    pub truncated: bool,
}

/// Generation plus evaluation for one style
#[derive(Debug, Clone, Serialize)]
pub struct StyleRun {
    pub generation: Generation,
    pub evaluation: EvaluationResult,
}

impl StyleRun {
    pub fn style(&self) -> &str {
        &self.generation.style
    }
}

/// Generates PRDs and scores them
pub struct ContentEvaluator {
    prompts: PromptManager,
    generator: Arc<dyn LlmClient>,
    evaluator: Arc<dyn LlmClient>,
    settings: EvaluatorSettings,
}

impl ContentEvaluator {
    pub fn new(
        prompts: PromptManager,
        generator: Arc<dyn LlmClient>,
        evaluator: Arc<dyn LlmClient>,
        settings: EvaluatorSettings,
    ) -> Self {
        debug!(generator = %generator.model(), evaluator = %evaluator.model(), "ContentEvaluator::new: called");
        Self {
            prompts,
            generator,
            evaluator,
            settings,
        }
    }

    /// Generate a PRD for `task` using the `prompt_type`/`style` system prompt
    pub async fn generate(&self, task: &TaskInfo, prompt_type: &str, style: &str) -> Result<Generation, EvalError> {
        debug!(%prompt_type, %style, title = %task.title, "generate: called");
        let system_prompt = self.prompts.generation_system_prompt(prompt_type, style)?;
        let user_prompt = self.prompts.generation_user_prompt(prompt_type, task)?;

        let request = CompletionRequest::single_turn(system_prompt, user_prompt, self.settings.generation_max_tokens)
            .with_temperature(self.settings.generation_temperature);

        let response = self.generator.complete(request).await?;
        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| EvalError::EmptyResponse {
                role: "generator".to_string(),
            })?;

        info!(
            "Generated {} PRD ({} chars, {} in / {} out tokens, ~${:.4})",
            style,
            content.len(),
            response.usage.input_tokens,
            response.usage.output_tokens,
            response.usage.cost_usd(self.generator.model())
        );

        Ok(Generation {
            prompt_type: prompt_type.to_string(),
            style: style.to_string(),
            model: self.generator.model().to_string(),
            content,
            truncated: response.stop_reason == StopReason::MaxTokens,
            usage: response.usage,
        })
    }

    /// Score `content` against the task it was generated from
    pub async fn evaluate(&self, content: &str, original_task: Option<&str>) -> Result<EvaluationResult, EvalError> {
        debug!(content_len = content.len(), has_task = original_task.is_some(), "evaluate: called");
        let system_prompt = self.prompts.evaluation_system_prompt()?;
        let user_prompt = self.prompts.evaluate_content_prompt(content, original_task)?;

        let request = CompletionRequest::single_turn(system_prompt, user_prompt, self.settings.evaluation_max_tokens)
            .with_temperature(self.settings.evaluation_temperature)
            .with_response_format(ResponseFormat::JsonObject);

        let response = self.evaluator.complete(request).await?;
        let text = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| EvalError::EmptyResponse {
                role: "evaluator".to_string(),
            })?;

        info!(
            "Evaluation received ({} in / {} out tokens, ~${:.4})",
            response.usage.input_tokens,
            response.usage.output_tokens,
            response.usage.cost_usd(self.evaluator.model())
        );

        let result = parse_evaluation(&text)?;
        debug!(overall = result.overall(), "evaluate: parsed");
        Ok(result)
    }

    /// Generate then evaluate one style
    pub async fn run(&self, task: &TaskInfo, prompt_type: &str, style: &str) -> Result<StyleRun, EvalError> {
        debug!(%prompt_type, %style, "run: called");
        let generation = self.generate(task, prompt_type, style).await?;
        let original_task = task.to_original_task();
        let evaluation = self.evaluate(&generation.content, Some(original_task.as_str())).await?;
        Ok(StyleRun { generation, evaluation })
    }

    /// Plain completion from the generator model
    pub async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, EvalError> {
        debug!(system_len = system_prompt.len(), user_len = user_prompt.len(), "complete: called");
        let request = CompletionRequest::single_turn(system_prompt, user_prompt, self.settings.generation_max_tokens)
            .with_temperature(self.settings.generation_temperature);

        let response = self.generator.complete(request).await?;
        response.content.ok_or_else(|| EvalError::EmptyResponse {
            role: "generator".to_string(),
        })
    }
}
