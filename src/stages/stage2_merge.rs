use std::collections::HashSet;

use tracing::debug;

use crate::models::{AggregateResult, ChunkAnalysisResult, DedupKey};

/// Merge chunk results into one aggregate, in chunk order.
///
/// Strengths, weaknesses, suggestions and questions are concatenated and
/// deduplicated by [`DedupKey`], keeping the first occurrence. Keys are
/// compared exactly (questions case-insensitively after trimming), so
/// differently worded duplicates survive. Narrative feedback fields are
/// concatenated across chunks. Chunk-local scores are dropped.
pub fn merge_results(results: &[ChunkAnalysisResult]) -> AggregateResult {
    let mut aggregate = AggregateResult {
        strengths: dedup_first_wins(results.iter().flat_map(|r| &r.strengths)),
        weaknesses: dedup_first_wins(results.iter().flat_map(|r| &r.weaknesses)),
        suggestions: dedup_first_wins(results.iter().flat_map(|r| &r.suggestions)),
        question_analysis: dedup_first_wins(results.iter().flat_map(|r| &r.question_analysis)),
        ..Default::default()
    };

    for result in results {
        aggregate
            .comprehensive_feedback
            .absorb(&result.comprehensive_feedback);
    }

    debug!(
        "Merged {} chunk results: {} strengths, {} weaknesses, {} suggestions, {} questions",
        results.len(),
        aggregate.strengths.len(),
        aggregate.weaknesses.len(),
        aggregate.suggestions.len(),
        aggregate.question_analysis.len()
    );

    aggregate
}

/// Keep the first item for each key, preserving order
fn dedup_first_wins<'a, T, I>(items: I) -> Vec<T>
where
    T: DedupKey + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut dropped = 0usize;

    for item in items {
        if seen.insert(item.dedup_key().into_owned()) {
            kept.push(item.clone());
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        debug!("Dropped {} duplicate items", dropped);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComprehensiveFeedback, QuestionAnalysis, Strength, Suggestion, Weakness};

    fn strength(description: &str, evidence: &str) -> Strength {
        Strength {
            category: "technical".to_string(),
            description: description.to_string(),
            evidence: evidence.to_string(),
        }
    }

    fn question(text: &str, answer: &str) -> QuestionAnalysis {
        QuestionAnalysis {
            question: text.to_string(),
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    fn suggestion(text: &str) -> Suggestion {
        Suggestion {
            suggestion: text.to_string(),
            priority: "medium".to_string(),
            ..Default::default()
        }
    }

    fn weakness(description: &str) -> Weakness {
        Weakness {
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_empty_is_identity() {
        let merged = merge_results(&[]);
        assert!(merged.strengths.is_empty());
        assert!(merged.weaknesses.is_empty());
        assert!(merged.suggestions.is_empty());
        assert!(merged.question_analysis.is_empty());
        assert!(merged.overall_score.is_none());
        assert_eq!(merged, AggregateResult::default());
    }

    #[test]
    fn test_merge_single_dedups_within_result() {
        let result = ChunkAnalysisResult {
            overall_score: 90.0,
            strengths: vec![strength("Clear", "a"), strength("Clear", "b")],
            weaknesses: vec![weakness("Rushed"), weakness("Rushed")],
            suggestions: vec![suggestion("Breathe"), suggestion("Pause")],
            question_analysis: vec![question("Q1", "x")],
            ..Default::default()
        };
        let merged = merge_results(std::slice::from_ref(&result));

        assert_eq!(merged.strengths, vec![strength("Clear", "a")]);
        assert_eq!(merged.weaknesses, vec![weakness("Rushed")]);
        assert_eq!(merged.suggestions.len(), 2);
        assert_eq!(merged.question_analysis, result.question_analysis);
        assert!(merged.overall_score.is_none());
    }

    #[test]
    fn test_merge_first_occurrence_wins_across_chunks() {
        let first = ChunkAnalysisResult {
            strengths: vec![strength("Strong debugging", "chunk one evidence")],
            ..Default::default()
        };
        let second = ChunkAnalysisResult {
            strengths: vec![
                strength("Strong debugging", "chunk two evidence"),
                strength("Good communication", "chunk two"),
            ],
            ..Default::default()
        };
        let merged = merge_results(&[first, second]);

        assert_eq!(merged.strengths.len(), 2);
        assert_eq!(merged.strengths[0].evidence, "chunk one evidence");
        assert_eq!(merged.strengths[1].description, "Good communication");
    }

    #[test]
    fn test_merge_near_duplicates_are_kept() {
        let a = ChunkAnalysisResult {
            strengths: vec![strength("Strong debugging", "")],
            ..Default::default()
        };
        let b = ChunkAnalysisResult {
            strengths: vec![strength("strong debugging", "")],
            ..Default::default()
        };
        assert_eq!(merge_results(&[a, b]).strengths.len(), 2);
    }

    #[test]
    fn test_merge_questions_case_insensitive() {
        let a = ChunkAnalysisResult {
            question_analysis: vec![question("What is a hash map?", "first answer")],
            ..Default::default()
        };
        let b = ChunkAnalysisResult {
            question_analysis: vec![question("what is a hash map? ", "second answer")],
            ..Default::default()
        };
        let merged = merge_results(&[a, b]);

        assert_eq!(merged.question_analysis.len(), 1);
        assert_eq!(merged.question_analysis[0].answer, "first answer");
    }

    #[test]
    fn test_merge_is_associative() {
        let a = ChunkAnalysisResult {
            strengths: vec![strength("A", "1")],
            suggestions: vec![suggestion("S1")],
            comprehensive_feedback: ComprehensiveFeedback {
                overall_impression: "good start".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let b = ChunkAnalysisResult {
            strengths: vec![strength("B", "2"), strength("A", "dup")],
            question_analysis: vec![question("Q", "b")],
            ..Default::default()
        };
        let c = ChunkAnalysisResult {
            strengths: vec![strength("B", "dup"), strength("C", "3")],
            suggestions: vec![suggestion("S1"), suggestion("S2")],
            question_analysis: vec![question(" q", "c")],
            comprehensive_feedback: ComprehensiveFeedback {
                overall_impression: "weak finish".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let nested = merge_results(&[
            merge_results(&[a.clone(), b.clone()]).into(),
            c.clone(),
        ]);
        let flat = merge_results(&[a, b, c]);

        assert_eq!(nested, flat);
        assert_eq!(
            flat.comprehensive_feedback.overall_impression,
            "good start\n\nweak finish"
        );
    }

    #[test]
    fn test_merge_skips_empty_chunk() {
        let a = ChunkAnalysisResult {
            strengths: vec![strength("A", "1")],
            ..Default::default()
        };
        let c = ChunkAnalysisResult {
            strengths: vec![strength("C", "3")],
            ..Default::default()
        };
        let merged = merge_results(&[a, ChunkAnalysisResult::empty(), c]);
        let descriptions: Vec<_> = merged.strengths.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(descriptions, vec!["A", "C"]);
    }
}
