//! Scored evaluation of a generated PRD

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lowest score a criterion may receive
pub const SCORE_MIN: f64 = 0.0;

/// Highest score a criterion may receive
pub const SCORE_MAX: f64 = 10.0;

/// One named axis of content evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Relevance,
    Clarity,
    Completeness,
    Measurability,
    Feasibility,
    Prioritization,
    AcceptanceCriteria,
}

impl Criterion {
    /// All criteria in report order
    pub const ALL: [Criterion; 7] = [
        Criterion::Relevance,
        Criterion::Clarity,
        Criterion::Completeness,
        Criterion::Measurability,
        Criterion::Feasibility,
        Criterion::Prioritization,
        Criterion::AcceptanceCriteria,
    ];

    /// Key used in evaluator responses
    pub fn key(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Clarity => "clarity",
            Self::Completeness => "completeness",
            Self::Measurability => "measurability",
            Self::Feasibility => "feasibility",
            Self::Prioritization => "prioritization",
            Self::AcceptanceCriteria => "acceptance_criteria",
        }
    }

    /// Display name for reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::Clarity => "Clarity",
            Self::Completeness => "Completeness",
            Self::Measurability => "Measurability",
            Self::Feasibility => "Feasibility",
            Self::Prioritization => "Prioritization",
            Self::AcceptanceCriteria => "Acceptance criteria",
        }
    }

    /// Weight in the weighted average; all weights sum to 1.0
    pub fn weight(&self) -> f64 {
        match self {
            Self::Relevance => 0.2,
            Self::Clarity => 0.15,
            Self::Completeness => 0.15,
            Self::Measurability
            | Self::Feasibility
            | Self::Prioritization
            | Self::AcceptanceCriteria => 0.125,
        }
    }

    /// Match a response key, ignoring case and `-`/space vs `_`
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        debug!(%key, %normalized, "Criterion::from_key: called");
        Self::ALL.into_iter().find(|c| c.key() == normalized)
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Score and rationale for one criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Per-criterion scores parsed from the evaluator's response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub scores: BTreeMap<Criterion, CriterionScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency_check: Option<String>,
    /// Overall score reported by the evaluator itself, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
}

impl EvaluationResult {
    pub fn get(&self, criterion: Criterion) -> Option<&CriterionScore> {
        self.scores.get(&criterion)
    }

    pub fn score(&self, criterion: Criterion) -> Option<f64> {
        self.get(criterion).map(|s| s.score)
    }

    /// Weighted sum of criterion scores; absent criteria contribute zero
    pub fn weighted_average(&self) -> f64 {
        self.scores
            .iter()
            .map(|(criterion, score)| score.score * criterion.weight())
            .sum()
    }

    /// Evaluator-reported overall score, falling back to the weighted average
    pub fn overall(&self) -> f64 {
        self.overall_score.unwrap_or_else(|| self.weighted_average())
    }

    /// Criteria the evaluator did not score
    pub fn missing_criteria(&self) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|c| !self.scores.contains_key(c))
            .collect()
    }
}
