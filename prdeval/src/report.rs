//! Human-readable reports for evaluations and style comparisons

use std::fmt::Write;

use colored::*;

use crate::domain::{Criterion, EvaluationResult, SCORE_MAX};
use crate::evaluator::StyleRun;

const RULE_WIDTH: usize = 50;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Whole numbers without decimals, everything else to one decimal
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}

/// Per-criterion scores and reasons, followed by suggestions and the total
pub fn render_evaluation(result: &EvaluationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());

    for criterion in Criterion::ALL {
        let Some(score) = result.get(criterion) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{}: {}/{}",
            criterion.name().bold(),
            format_score(score.score),
            format_score(SCORE_MAX)
        );
        let _ = writeln!(
            out,
            "  Reason: {}",
            score.reason.as_deref().unwrap_or("No reason provided")
        );
    }

    let missing = result.missing_criteria();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|c| c.name()).collect();
        let _ = writeln!(out, "{} {}", "Not scored:".yellow(), names.join(", "));
    }

    if !result.suggestions.is_empty() {
        let _ = writeln!(out, "\n{}", "Suggestions for improvement:".bold());
        for suggestion in &result.suggestions {
            let _ = writeln!(out, "- {}", suggestion);
        }
    }

    if let Some(check) = &result.consistency_check {
        let _ = writeln!(out, "\n{}", "Consistency check:".bold());
        let _ = writeln!(out, "{}", check);
    }

    let basis = if result.overall_score.is_some() {
        "reported"
    } else {
        "weighted"
    };
    let _ = writeln!(
        out,
        "\n{} {:.1}/{} ({})",
        "Total:".bold(),
        result.overall(),
        format_score(SCORE_MAX),
        basis
    );
    let _ = writeln!(out, "{}", rule());
    out
}

/// Side-by-side scores for each style, naming the best overall
pub fn render_comparison(runs: &[StyleRun]) -> String {
    let mut out = String::new();
    if runs.is_empty() {
        return out;
    }

    let label_width = Criterion::ALL
        .iter()
        .map(|c| c.name().len())
        .max()
        .unwrap_or(0)
        .max("Overall".len());
    let column_width = runs.iter().map(|r| r.style().len()).max().unwrap_or(0).max(5);

    let _ = writeln!(out, "{}", "Style comparison".bold());
    let _ = write!(out, "{:<label_width$}", "Criterion");
    for run in runs {
        let _ = write!(out, "  {:>column_width$}", run.style());
    }
    let _ = writeln!(out);

    for criterion in Criterion::ALL {
        let _ = write!(out, "{:<label_width$}", criterion.name());
        for run in runs {
            let cell = run
                .evaluation
                .score(criterion)
                .map(format_score)
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(out, "  {:>column_width$}", cell);
        }
        let _ = writeln!(out);
    }

    let _ = write!(out, "{:<label_width$}", "Overall");
    for run in runs {
        let _ = write!(out, "  {:>column_width$}", format!("{:.1}", run.evaluation.overall()));
    }
    let _ = writeln!(out);

    if let Some(best) = best_run(runs) {
        let _ = writeln!(
            out,
            "\n{} {} ({:.1}/{})",
            "Best style:".green().bold(),
            best.style(),
            best.evaluation.overall(),
            format_score(SCORE_MAX)
        );
    }
    out
}

/// Highest overall score; the earliest run wins ties
pub fn best_run(runs: &[StyleRun]) -> Option<&StyleRun> {
    runs.iter().fold(None, |best: Option<&StyleRun>, run| match best {
        Some(b) if b.evaluation.overall() >= run.evaluation.overall() => Some(b),
        _ => Some(run),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CriterionScore;
    use crate::evaluator::Generation;
    use crate::llm::TokenUsage;

    fn no_color() {
        colored::control::set_override(false);
    }

    fn result(scores: &[(Criterion, f64)]) -> EvaluationResult {
        EvaluationResult {
            scores: scores
                .iter()
                .map(|(c, s)| {
                    (
                        *c,
                        CriterionScore {
                            score: *s,
                            reason: Some(format!("{} reason", c.key())),
                        },
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    fn run(style: &str, evaluation: EvaluationResult) -> StyleRun {
        StyleRun {
            generation: Generation {
                prompt_type: "enrich_task".to_string(),
                style: style.to_string(),
                model: "mock".to_string(),
                content: "# PRD".to_string(),
                usage: TokenUsage::default(),
                truncated: false,
            },
            evaluation,
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(8.0), "8");
        assert_eq!(format_score(7.25), "7.2");
        assert_eq!(format_score(6.5), "6.5");
    }

    #[test]
    fn test_render_evaluation() {
        no_color();
        let mut evaluation = result(&[(Criterion::Relevance, 9.0), (Criterion::Clarity, 7.5)]);
        evaluation.suggestions = vec!["Add metrics".to_string()];
        evaluation.consistency_check = Some("Consistent".to_string());

        let text = render_evaluation(&evaluation);

        assert!(text.contains("Relevance: 9/10"));
        assert!(text.contains("  Reason: relevance reason"));
        assert!(text.contains("Clarity: 7.5/10"));
        assert!(text.contains("Not scored: Completeness, Measurability"));
        assert!(text.contains("- Add metrics"));
        assert!(text.contains("Consistency check:\nConsistent"));
        // 9*.2 + 7.5*.15 = 2.925
        assert!(text.contains("Total: 2.9/10 (weighted)"));
    }

    #[test]
    fn test_render_evaluation_reported_overall() {
        no_color();
        let mut evaluation = result(&[(Criterion::Relevance, 9.0)]);
        evaluation.overall_score = Some(8.0);

        let text = render_evaluation(&evaluation);
        assert!(text.contains("Total: 8.0/10 (reported)"));
    }

    #[test]
    fn test_render_comparison() {
        no_color();
        let all_eight: Vec<(Criterion, f64)> = Criterion::ALL.iter().map(|c| (*c, 8.0)).collect();
        let all_six: Vec<(Criterion, f64)> = Criterion::ALL.iter().map(|c| (*c, 6.0)).collect();
        let runs = vec![run("concise", result(&all_six)), run("comprehensive", result(&all_eight))];

        let text = render_comparison(&runs);

        assert!(text.contains("comprehensive"));
        assert!(text.lines().any(|l| l.starts_with("Relevance") && l.contains('6') && l.contains('8')));
        assert!(text.lines().any(|l| l.starts_with("Overall") && l.contains("6.0") && l.contains("8.0")));
        assert!(text.contains("Best style: comprehensive (8.0/10)"));
    }

    #[test]
    fn test_render_comparison_missing_scores() {
        no_color();
        let runs = vec![run("concise", result(&[(Criterion::Relevance, 5.0)]))];
        let text = render_comparison(&runs);
        assert!(text.lines().any(|l| l.starts_with("Clarity") && l.trim_end().ends_with('-')));
    }

    #[test]
    fn test_best_run_prefers_first_on_tie() {
        let runs = vec![
            run("a", result(&[(Criterion::Relevance, 5.0)])),
            run("b", result(&[(Criterion::Relevance, 5.0)])),
        ];
        assert_eq!(best_run(&runs).unwrap().style(), "a");
        assert!(best_run(&[]).is_none());
        assert!(render_comparison(&[]).is_empty());
    }
}
