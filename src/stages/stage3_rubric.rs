use tracing::info;

use crate::models::{AggregateResult, Criteria, QuestionEvaluation, RubricTable};

/// Build standardized feedback for one evaluated answer
pub fn generate_feedback(
    question_type: &str,
    evaluation: &QuestionEvaluation,
    criteria: &Criteria,
) -> String {
    let band = if evaluation.score >= criteria.excellent_threshold {
        "excellent"
    } else if evaluation.score >= criteria.passing_threshold {
        "meets expectations"
    } else {
        "below expectations"
    };

    let mut feedback = format!(
        "{} ({}): {:.0}/100, {}.",
        criteria.name,
        question_type.trim(),
        evaluation.score,
        band
    );

    if !evaluation.strengths.is_empty() {
        feedback.push_str(&format!(" Strengths: {}.", join_clauses(&evaluation.strengths)));
    }
    if !evaluation.weaknesses.is_empty() {
        feedback.push_str(&format!(
            " Areas to improve: {}.",
            join_clauses(&evaluation.weaknesses)
        ));
    }
    if !criteria.focus_areas.is_empty() {
        feedback.push_str(&format!(
            " A strong answer demonstrates {}.",
            criteria.focus_areas.join(", ")
        ));
    }
    if evaluation.score < criteria.excellent_threshold {
        // Tip choice is deterministic in the score
        if !criteria.improvement_tips.is_empty() {
            let pick = (evaluation.score.max(0.0) as usize) % criteria.improvement_tips.len();
            feedback.push_str(&format!(" Tip: {}", criteria.improvement_tips[pick]));
        }
    }

    feedback
}

fn join_clauses(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim().trim_end_matches('.'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Attach `professional_feedback` to every question that carries an evaluation.
///
/// Returns the number of questions enriched.
pub fn apply_rubric(result: &mut AggregateResult, rubric: &RubricTable) -> usize {
    let mut enriched = 0;

    for entry in &mut result.question_analysis {
        let Some(evaluation) = &entry.evaluation else {
            continue;
        };
        let Some(criteria) = rubric.lookup(&entry.question_type) else {
            continue;
        };
        entry.professional_feedback =
            Some(generate_feedback(&entry.question_type, evaluation, criteria));
        enriched += 1;
    }

    info!(
        "Rubric feedback attached to {} of {} questions",
        enriched,
        result.question_analysis.len()
    );
    enriched
}
