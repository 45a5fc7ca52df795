use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::AggregateResult;
use crate::pipeline::AnalysisOutcome;

/// Machine-readable report: the aggregate result plus run metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub result: AggregateResult,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub transcript_chars: usize,
    pub chunk_count: usize,
    pub chunks_failed: usize,
    pub multi_chunk: bool,
    pub speakers_attributed: bool,
    pub questions_enriched: usize,
}

impl AnalysisReport {
    pub fn from_outcome(outcome: AnalysisOutcome) -> Self {
        let metadata = ReportMetadata {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            transcript_chars: outcome.transcript_chars,
            chunk_count: outcome.chunk_count,
            chunks_failed: outcome.chunks_failed,
            multi_chunk: outcome.multi_chunk,
            speakers_attributed: outcome.speakers_attributed,
            questions_enriched: outcome.questions_enriched,
        };
        Self {
            result: outcome.result,
            metadata,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable report format
pub struct HumanReport<'a> {
    report: &'a AnalysisReport,
}

const WRAP_WIDTH: usize = 80;

impl<'a> HumanReport<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }

    /// Format the report as sectioned plain text
    pub fn format(&self) -> String {
        let result = &self.report.result;
        let meta = &self.report.metadata;
        let mut output = String::new();

        output.push_str("Interview Evaluation\n");
        output.push_str("====================\n");
        if let Some(score) = result.overall_score {
            output.push_str(&format!("Overall score: {:.0}/100\n", score));
        }
        output.push_str(&format!(
            "Analyzed {} chars in {} chunk(s){}\n\n",
            meta.transcript_chars,
            meta.chunk_count,
            if meta.chunks_failed > 0 {
                format!(", {} failed", meta.chunks_failed)
            } else {
                String::new()
            }
        ));

        section(&mut output, "Strengths");
        for s in &result.strengths {
            bullet(&mut output, &format!("[{}] {}", s.category, s.description));
            detail(&mut output, "Evidence", &s.evidence);
        }

        section(&mut output, "Weaknesses");
        for w in &result.weaknesses {
            bullet(&mut output, &format!("[{}] {}", w.category, w.description));
            detail(&mut output, "Impact", &w.impact);
            detail(&mut output, "Improvement", &w.improvement);
        }

        section(&mut output, "Suggestions");
        let mut suggestions: Vec<_> = result.suggestions.iter().collect();
        suggestions.sort_by_key(|s| priority_rank(&s.priority));
        for s in suggestions {
            bullet(
                &mut output,
                &format!("({}) {}", or_dash(&s.priority), s.suggestion),
            );
            detail(&mut output, "Action", &s.actionable);
        }

        section(&mut output, "Questions");
        for (i, q) in result.question_analysis.iter().enumerate() {
            output.push_str(&format!(
                "{}. {} [{} / {} / {}]\n",
                i + 1,
                q.question.trim(),
                or_dash(&q.question_type),
                or_dash(&q.difficulty),
                or_dash(&q.priority)
            ));
            detail(&mut output, "Answer", &q.answer);
            detail(&mut output, "Recommended", &q.recommended_answer);
            if let Some(feedback) = &q.professional_feedback {
                detail(&mut output, "Feedback", feedback);
            }
        }

        let feedback = &result.comprehensive_feedback;
        if !feedback.is_empty() {
            section(&mut output, "Overall Feedback");
            for (label, text) in [
                ("Technical assessment", &feedback.technical_assessment),
                ("Communication", &feedback.communication_skills),
                ("Learning potential", &feedback.learning_potential),
                ("Experience", &feedback.experience_evaluation),
                ("Impression", &feedback.overall_impression),
                ("Highlights", &feedback.key_highlights),
                ("Concerns", &feedback.main_concerns),
                ("Recommendation", &feedback.recommendation),
            ] {
                if !text.trim().is_empty() {
                    output.push_str(&format!("{}:\n", label));
                    output.push_str(&indent(&wrap_text(text, WRAP_WIDTH - 2), "  "));
                    output.push_str("\n\n");
                }
            }
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn section(output: &mut String, title: &str) {
    output.push_str(&format!("\n{}\n{}\n", title, "-".repeat(title.chars().count())));
}

fn bullet(output: &mut String, text: &str) {
    let wrapped = wrap_text(text, WRAP_WIDTH - 2);
    let mut lines = wrapped.lines();
    if let Some(first) = lines.next() {
        output.push_str(&format!("- {}\n", first));
    }
    for line in lines {
        output.push_str(&format!("  {}\n", line));
    }
}

fn detail(output: &mut String, label: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    let wrapped = wrap_text(&format!("{}: {}", label, text), WRAP_WIDTH - 4);
    output.push_str(&indent(&wrapped, "    "));
    output.push('\n');
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() { "-" } else { text.trim() }
}

/// 0 = high, 1 = medium, 2 = low, 3 = unknown
fn priority_rank(priority: &str) -> u8 {
    match priority.trim().to_lowercase().as_str() {
        "high" => 0,
        "medium" => 1,
        "low" => 2,
        _ => 3,
    }
}

/// Wrap text at approximately the given width, keeping paragraph breaks
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();

    for (i, paragraph) in text.split('\n').enumerate() {
        if i > 0 {
            result.push('\n');
        }
        let mut line_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if line_len + word_len + 1 > width && line_len > 0 {
                result.push('\n');
                line_len = 0;
            }
            if line_len > 0 {
                result.push(' ');
                line_len += 1;
            }
            result.push_str(word);
            line_len += word_len;
        }
    }

    result
}
