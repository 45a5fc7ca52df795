/// Scoring rubric and output schema shared by every analysis prompt
pub const ANALYSIS_RUBRIC: &str = r#"QUESTION TYPES (use only these):
- algorithm: coding problems, data structures, complexity analysis
- system_design: architecture, scalability, distributed systems
- behavioral: past experience, teamwork, conflict, motivation
- technical: language, framework or domain knowledge questions

DIFFICULTY (use only these): easy, medium, hard

PRIORITY (use only these):
- high: critical gaps or questions that decide the hiring outcome. Mark AT MOST 5 items as high.
- medium: meaningful improvements worth preparing for
- low: polish and minor details

OUTPUT FORMAT:
Respond with a single JSON object and nothing else:
{
  "overallScore": <number 0-100>,
  "strengths": [{"category": "", "description": "", "evidence": ""}],
  "weaknesses": [{"category": "", "description": "", "impact": "", "improvement": ""}],
  "suggestions": [{"priority": "high|medium|low", "category": "", "suggestion": "", "actionable": ""}],
  "questionAnalysis": [{
    "question": "",
    "answer": "",
    "questionType": "algorithm|system_design|behavioral|technical",
    "difficulty": "easy|medium|hard",
    "priority": "high|medium|low",
    "recommendedAnswer": "",
    "evaluation": {"score": <number 0-100>, "strengths": [""], "weaknesses": [""], "comment": ""}
  }],
  "comprehensiveFeedback": {
    "technicalAssessment": "",
    "communicationSkills": "",
    "learningPotential": "",
    "experienceEvaluation": "",
    "overallImpression": "",
    "keyHighlights": "",
    "mainConcerns": "",
    "recommendation": ""
  }
}"#;

/// Build the system prompt for analyzing chunk `index` of `total`
pub fn build_analysis_system_prompt(index: usize, total: usize) -> String {
    let framing = if total <= 1 {
        "You are an experienced technical interviewer. Analyze the following interview \
         transcript and evaluate the candidate's performance."
            .to_string()
    } else {
        format!(
            "You are an experienced technical interviewer. The interview transcript is too long \
             to review at once and has been split into {total} consecutive parts. This is part \
             {index} of {total}. Analyze only what appears in this part: do not assume the \
             interview starts or ends here, and do not invent content from other parts. Questions \
             or answers cut off at the edges of this part may be completed in a neighbouring part."
        )
    };

    format!(
        "{framing}\n\n\
         Identify the candidate's strengths and weaknesses with concrete evidence from the \
         transcript, give prioritized suggestions, and break down every question that was asked \
         with a recommended answer.\n\n{ANALYSIS_RUBRIC}"
    )
}

/// Build the user prompt carrying the chunk text
pub fn build_analysis_user_prompt(chunk_text: &str, index: usize, total: usize) -> String {
    let mut prompt = String::new();

    if total <= 1 {
        prompt.push_str("# Interview Transcript\n\n");
    } else {
        prompt.push_str(&format!("# Interview Transcript (part {} of {})\n\n", index, total));
    }
    prompt.push_str(chunk_text);
    prompt.push_str("\n\n");
    prompt.push_str("Return the analysis as a single JSON object.");

    prompt
}
