use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Question type used when a type is missing from the rubric table
pub const FALLBACK_QUESTION_TYPE: &str = "technical";

/// Evaluation criteria for one question type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    /// Display name of the rubric
    pub name: String,
    /// What a strong answer demonstrates
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Minimum score (0-100) considered excellent
    #[serde(default = "default_excellent_threshold")]
    pub excellent_threshold: f64,
    /// Minimum score (0-100) considered passing
    #[serde(default = "default_passing_threshold")]
    pub passing_threshold: f64,
    /// Advice attached when the answer falls short of excellent
    #[serde(default)]
    pub improvement_tips: Vec<String>,
}

fn default_excellent_threshold() -> f64 {
    85.0
}

fn default_passing_threshold() -> f64 {
    60.0
}

impl Criteria {
    fn new(name: &str, focus_areas: &[&str], improvement_tips: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            focus_areas: focus_areas.iter().map(|s| s.to_string()).collect(),
            excellent_threshold: default_excellent_threshold(),
            passing_threshold: default_passing_threshold(),
            improvement_tips: improvement_tips.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Rubric criteria keyed by question type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricTable {
    pub criteria: HashMap<String, Criteria>,
}

impl Default for RubricTable {
    fn default() -> Self {
        let mut criteria = HashMap::new();
        criteria.insert(
            "algorithm".to_string(),
            Criteria::new(
                "Algorithm & Data Structures",
                &[
                    "correctness",
                    "time and space complexity",
                    "edge case handling",
                    "code clarity",
                ],
                &[
                    "State the complexity of your solution before optimizing it.",
                    "Walk through edge cases such as empty input and duplicates out loud.",
                ],
            ),
        );
        criteria.insert(
            "system_design".to_string(),
            Criteria::new(
                "System Design",
                &[
                    "requirements clarification",
                    "component decomposition",
                    "scalability and bottlenecks",
                    "trade-off reasoning",
                ],
                &[
                    "Clarify functional and non-functional requirements first.",
                    "Name the trade-off behind each major component choice.",
                ],
            ),
        );
        criteria.insert(
            "behavioral".to_string(),
            Criteria::new(
                "Behavioral",
                &[
                    "situation and task context",
                    "personal ownership of actions",
                    "measurable results",
                    "reflection",
                ],
                &[
                    "Structure answers with the STAR method.",
                    "Quantify the outcome of the story you tell.",
                ],
            ),
        );
        criteria.insert(
            FALLBACK_QUESTION_TYPE.to_string(),
            Criteria::new(
                "Technical Knowledge",
                &[
                    "accuracy of concepts",
                    "depth of understanding",
                    "practical experience",
                    "clarity of explanation",
                ],
                &[
                    "Ground explanations in a concrete project you worked on.",
                    "Explain the why behind a mechanism, not only the what.",
                ],
            ),
        );
        Self { criteria }
    }
}

impl RubricTable {
    /// Look up criteria for a question type, falling back to the technical rubric
    pub fn lookup(&self, question_type: &str) -> Option<&Criteria> {
        let key = question_type.trim().to_lowercase();
        self.criteria
            .get(&key)
            .or_else(|| self.criteria.get(FALLBACK_QUESTION_TYPE))
    }

    /// Add or replace entries, keeping built-in entries not mentioned in `overrides`
    pub fn extend(&mut self, overrides: HashMap<String, Criteria>) {
        for (question_type, criteria) in overrides {
            self.criteria
                .insert(question_type.trim().to_lowercase(), criteria);
        }
    }
}
