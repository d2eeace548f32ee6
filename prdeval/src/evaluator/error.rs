//! Evaluator error types

use thiserror::Error;

use crate::llm::LlmError;
use crate::prompts::PromptError;

/// Errors from a generate/evaluate run
///
/// Every failure reaches the caller unchanged; nothing is retried.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("{role} returned no text")]
    EmptyResponse { role: String },

    #[error("Failed to parse evaluation: {0}")]
    Parse(#[from] ParseError),
}

/// Errors turning the evaluator's text into scores
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON ({message}): {snippet}")]
    InvalidJson { message: String, snippet: String },

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response contains no recognized criteria")]
    NoCriteria,

    #[error("score for {field} is not a number")]
    InvalidScore { field: String },

    #[error("score for {field} is {score}, outside {min}-{max}")]
    ScoreOutOfRange { field: String, score: f64, min: f64, max: f64 },
}
