//! Domain types: task inputs and evaluation results

mod evaluation;
mod task;

pub use evaluation::{Criterion, CriterionScore, EvaluationResult, SCORE_MAX, SCORE_MIN};
pub use task::{NO_ORIGINAL_TASK, NO_PARENT_INFO, ParentTask, TaskInfo};
