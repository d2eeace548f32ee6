//! PRD generation and evaluation

mod content;
mod error;
mod parse;

pub use content::{ContentEvaluator, EvaluatorSettings, Generation, StyleRun};
pub use error::{EvalError, ParseError};
pub use parse::{parse_evaluation, strip_code_fence};
