//! Parsing evaluator responses into scores
//!
//! Two response shapes are accepted:
//!
//! ```text
//! {"relevance": {"score": 8, "reason": "..."}, "clarity": 7, ...}
//! {"scores": {"relevance": 8, ...}, "reasons": {...}, "overall_score": 7.5}
//! ```
//!
//! Either may carry `suggestions` and `consistency_check`, and may arrive
//! wrapped in a Markdown code fence.

use serde_json::{Map, Value};
use tracing::debug;

use super::ParseError;
use crate::domain::{Criterion, CriterionScore, EvaluationResult, SCORE_MAX, SCORE_MIN};

/// Characters of the raw response kept in parse errors
const SNIPPET_LEN: usize = 200;

/// Parse the evaluator's text response
pub fn parse_evaluation(text: &str) -> Result<EvaluationResult, ParseError> {
    debug!(text_len = text.len(), "parse_evaluation: called");
    let json_text = strip_code_fence(text);

    let value: Value = serde_json::from_str(json_text).map_err(|e| ParseError::InvalidJson {
        message: e.to_string(),
        snippet: text.chars().take(SNIPPET_LEN).collect(),
    })?;

    let obj = value.as_object().ok_or(ParseError::NotAnObject)?;

    let mut result = EvaluationResult::default();

    if let Some(scores) = obj.get("scores").and_then(Value::as_object) {
        debug!("parse_evaluation: aggregate format");
        let reasons = obj.get("reasons").and_then(Value::as_object);
        collect_scores(scores, reasons, &mut result)?;
    } else {
        debug!("parse_evaluation: per-criterion format");
        collect_scores(obj, None, &mut result)?;
    }

    if result.scores.is_empty() {
        debug!("parse_evaluation: no criteria found");
        return Err(ParseError::NoCriteria);
    }

    if let Some(suggestions) = obj.get("suggestions").and_then(Value::as_array) {
        result.suggestions = suggestions.iter().map(text_of).filter(|s| !s.is_empty()).collect();
    }

    result.consistency_check = obj
        .get("consistency_check")
        .filter(|v| !v.is_null())
        .map(text_of)
        .filter(|s| !s.is_empty());

    if let Some(overall) = obj.get("overall_score").filter(|v| !v.is_null()) {
        let score = score_value(overall).ok_or_else(|| ParseError::InvalidScore {
            field: "overall_score".to_string(),
        })?;
        result.overall_score = Some(check_range("overall_score", score)?);
    }

    debug!(criteria = result.scores.len(), "parse_evaluation: done");
    Ok(result)
}

/// Remove a surrounding Markdown code fence and its info string
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let inner = match rest.find('\n') {
        Some(end) if !rest[..end].contains(['{', '[']) => &rest[end + 1..],
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn collect_scores(
    entries: &Map<String, Value>,
    reasons: Option<&Map<String, Value>>,
    result: &mut EvaluationResult,
) -> Result<(), ParseError> {
    for (key, value) in entries {
        let Some(criterion) = Criterion::from_key(key) else {
            debug!(%key, "collect_scores: skipping unknown key");
            continue;
        };

        let mut score = criterion_score(criterion, value)?;
        if score.reason.is_none() {
            score.reason = reasons
                .and_then(|r| r.iter().find(|(k, _)| Criterion::from_key(k) == Some(criterion)))
                .map(|(_, reason)| text_of(reason))
                .filter(|s| !s.is_empty());
        }
        result.scores.insert(criterion, score);
    }
    Ok(())
}

fn criterion_score(criterion: Criterion, value: &Value) -> Result<CriterionScore, ParseError> {
    let invalid = || ParseError::InvalidScore {
        field: criterion.key().to_string(),
    };

    let (score, reason) = match value {
        Value::Object(fields) => {
            let score = fields.get("score").and_then(score_value).ok_or_else(invalid)?;
            let reason = fields.get("reason").map(text_of).filter(|s| !s.is_empty());
            (score, reason)
        }
        other => (score_value(other).ok_or_else(invalid)?, None),
    };

    Ok(CriterionScore {
        score: check_range(criterion.key(), score)?,
        reason,
    })
}

/// Numeric score from a number, a numeric string, or an "8/10" string
fn score_value(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let head = s.split('/').next().unwrap_or(s).trim();
            head.parse::<f64>().ok()
        }
        _ => None,
    };
    score.filter(|score| score.is_finite())
}

fn check_range(field: &str, score: f64) -> Result<f64, ParseError> {
    if (SCORE_MIN..=SCORE_MAX).contains(&score) {
        Ok(score)
    } else {
        debug!(%field, %score, "check_range: out of range");
        Err(ParseError::ScoreOutOfRange {
            field: field.to_string(),
            score,
            min: SCORE_MIN,
            max: SCORE_MAX,
        })
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
