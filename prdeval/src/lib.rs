//! prdeval - PRD generation and evaluation
//!
//! Turns a task description into a Product Requirements Document with one
//! model, then scores that document with a second model against a fixed set
//! of criteria.
//!
//! # Core Concepts
//!
//! - **Prompt catalog**: system prompts indexed by (type, style) and
//!   placeholder templates, loaded from `prompts.json`
//! - **Two calls**: generate, then evaluate; no retries, failures surface as-is
//! - **Scores**: seven criteria on a 0-10 scale with a weighted total
//!
//! # Modules
//!
//! - [`prompts`] - Prompt catalog loading and template rendering
//! - [`evaluator`] - Generation and evaluation pipeline
//! - [`llm`] - LLM client trait with Anthropic and OpenAI implementations
//! - [`domain`] - Task input and evaluation result types
//! - [`report`] - Text rendering of results
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod evaluator;
pub mod llm;
pub mod prompts;
pub mod report;

pub use config::Config;
pub use domain::{Criterion, EvaluationResult, TaskInfo};
pub use evaluator::{ContentEvaluator, EvalError};
pub use llm::{LlmClient, LlmError};
pub use prompts::{PromptError, PromptManager};
