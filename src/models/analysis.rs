use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

/// A strength observed in the candidate's answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Strength {
    #[serde(deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub evidence: String,
}

/// A weakness observed in the candidate's answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Weakness {
    #[serde(deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub impact: String,
    #[serde(deserialize_with = "lenient_text")]
    pub improvement: String,
}

/// A prioritized suggestion for the candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Suggestion {
    /// `high`, `medium` or `low`
    #[serde(deserialize_with = "lenient_text")]
    pub priority: String,
    #[serde(deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(deserialize_with = "lenient_text")]
    pub suggestion: String,
    #[serde(deserialize_with = "lenient_text")]
    pub actionable: String,
}

/// Optional per-question evaluation the model may attach
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionEvaluation {
    /// Score from 0 to 100
    #[serde(deserialize_with = "lenient_score")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub weaknesses: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub comment: String,
}

/// Breakdown of a single interview question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionAnalysis {
    #[serde(deserialize_with = "lenient_text")]
    pub question: String,
    #[serde(deserialize_with = "lenient_text")]
    pub answer: String,
    /// `algorithm`, `system_design`, `behavioral` or `technical`
    #[serde(deserialize_with = "lenient_text")]
    pub question_type: String,
    /// `easy`, `medium` or `hard`
    #[serde(deserialize_with = "lenient_text")]
    pub difficulty: String,
    /// `high`, `medium` or `low`
    #[serde(deserialize_with = "lenient_text")]
    pub priority: String,
    #[serde(deserialize_with = "lenient_text")]
    pub recommended_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<QuestionEvaluation>,
    /// Standardized feedback attached by the rubric post-processor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_feedback: Option<String>,
}

/// Narrative feedback block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComprehensiveFeedback {
    #[serde(deserialize_with = "lenient_text")]
    pub technical_assessment: String,
    #[serde(deserialize_with = "lenient_text")]
    pub communication_skills: String,
    #[serde(deserialize_with = "lenient_text")]
    pub learning_potential: String,
    #[serde(deserialize_with = "lenient_text")]
    pub experience_evaluation: String,
    #[serde(deserialize_with = "lenient_text")]
    pub overall_impression: String,
    #[serde(deserialize_with = "lenient_text")]
    pub key_highlights: String,
    #[serde(deserialize_with = "lenient_text")]
    pub main_concerns: String,
    #[serde(deserialize_with = "lenient_text")]
    pub recommendation: String,
}

impl ComprehensiveFeedback {
    fn fields_mut(&mut self) -> [&mut String; 8] {
        [
            &mut self.technical_assessment,
            &mut self.communication_skills,
            &mut self.learning_potential,
            &mut self.experience_evaluation,
            &mut self.overall_impression,
            &mut self.key_highlights,
            &mut self.main_concerns,
            &mut self.recommendation,
        ]
    }

    fn fields(&self) -> [&String; 8] {
        [
            &self.technical_assessment,
            &self.communication_skills,
            &self.learning_potential,
            &self.experience_evaluation,
            &self.overall_impression,
            &self.key_highlights,
            &self.main_concerns,
            &self.recommendation,
        ]
    }

    /// True when every field is blank
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|f| f.trim().is_empty())
    }

    /// Append each non-blank field of `other` to the matching field here,
    /// separated by a blank line.
    pub fn absorb(&mut self, other: &ComprehensiveFeedback) {
        for (mine, theirs) in self.fields_mut().into_iter().zip(other.fields()) {
            let theirs = theirs.trim();
            if theirs.is_empty() {
                continue;
            }
            if !mine.is_empty() {
                mine.push_str("\n\n");
            }
            mine.push_str(theirs);
        }
    }
}

/// Parsed output of one model call for one chunk.
///
/// Always well-formed: a failed chunk is represented by [`ChunkAnalysisResult::empty`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkAnalysisResult {
    /// Chunk-local score, discarded when chunks are merged
    #[serde(deserialize_with = "lenient_score")]
    pub overall_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub strengths: Vec<Strength>,
    #[serde(deserialize_with = "null_as_default")]
    pub weaknesses: Vec<Weakness>,
    #[serde(deserialize_with = "null_as_default")]
    pub suggestions: Vec<Suggestion>,
    #[serde(deserialize_with = "null_as_default")]
    pub question_analysis: Vec<QuestionAnalysis>,
    #[serde(deserialize_with = "null_as_default")]
    pub comprehensive_feedback: ComprehensiveFeedback,
}

impl ChunkAnalysisResult {
    /// The canonical empty-but-valid result
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the chunk contributed no content
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.suggestions.is_empty()
            && self.question_analysis.is_empty()
            && self.comprehensive_feedback.is_empty()
    }
}

/// Final evaluation handed back to the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateResult {
    /// Present only when the transcript was evaluated in a single call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Weakness>,
    pub suggestions: Vec<Suggestion>,
    pub question_analysis: Vec<QuestionAnalysis>,
    pub comprehensive_feedback: ComprehensiveFeedback,
}

impl AggregateResult {
    /// Wrap a single-call result without merging
    pub fn from_single(result: ChunkAnalysisResult) -> Self {
        Self {
            overall_score: Some(result.overall_score),
            strengths: result.strengths,
            weaknesses: result.weaknesses,
            suggestions: result.suggestions,
            question_analysis: result.question_analysis,
            comprehensive_feedback: result.comprehensive_feedback,
        }
    }

    /// Number of high-priority suggestions and questions
    pub fn high_priority_count(&self) -> usize {
        let is_high = |p: &str| p.trim().eq_ignore_ascii_case("high");
        self.suggestions.iter().filter(|s| is_high(&s.priority)).count()
            + self
                .question_analysis
                .iter()
                .filter(|q| is_high(&q.priority))
                .count()
    }
}

impl From<AggregateResult> for ChunkAnalysisResult {
    fn from(result: AggregateResult) -> Self {
        Self {
            overall_score: 0.0,
            strengths: result.strengths,
            weaknesses: result.weaknesses,
            suggestions: result.suggestions,
            question_analysis: result.question_analysis,
            comprehensive_feedback: result.comprehensive_feedback,
        }
    }
}

/// Identity of an item when merging results from several chunks
pub trait DedupKey {
    fn dedup_key(&self) -> Cow<'_, str>;
}

impl DedupKey for Strength {
    fn dedup_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.description.as_str())
    }
}

impl DedupKey for Weakness {
    fn dedup_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.description.as_str())
    }
}

impl DedupKey for Suggestion {
    fn dedup_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.suggestion.as_str())
    }
}

impl DedupKey for QuestionAnalysis {
    // Questions are matched case-insensitively, ignoring surrounding whitespace
    fn dedup_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.question.trim().to_lowercase())
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept strings, numbers, booleans, null, or arrays of those as text
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

fn value_to_text(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => value.to_string(),
    }
}

/// Accept a number or a numeric string; anything unparseable becomes 0
fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
