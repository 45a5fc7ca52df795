/// Label prefixed to interviewer lines
pub const INTERVIEWER_LABEL: &str = "面试官：";
/// Label prefixed to candidate lines
pub const CANDIDATE_LABEL: &str = "候选人：";

/// Build the system prompt for speaker attribution
pub fn build_speaker_system_prompt() -> String {
    format!(
        r#"You label speakers in job interview transcripts.

The transcript has no speaker labels. Rewrite it so that every line starts with exactly one of these labels:
- "{INTERVIEWER_LABEL}" for the interviewer
- "{CANDIDATE_LABEL}" for the candidate

## Rules

1. Keep the content of every line verbatim. Do not summarize, translate, correct, or drop anything.
2. Keep the original line order.
3. When the speaker is ambiguous, infer it from linguistic cues: interviewers ask questions, set up problems and give prompts; candidates answer, explain their reasoning and describe their experience.
4. A line that contains both speakers may be split at the point where the speaker changes.
5. Output only the labeled transcript, with no preamble or commentary."#
    )
}

/// Build the user prompt carrying the raw transcript
pub fn build_speaker_user_prompt(transcript: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("# Transcript\n\n");
    prompt.push_str(transcript);
    prompt.push_str("\n\n# Task\n\nReturn the transcript with a speaker label on every line.\n");
    prompt
}

/// Whether a line starts with a speaker label (full-width or ASCII colon)
pub fn has_speaker_label(line: &str) -> bool {
    let line = line.trim_start();
    [INTERVIEWER_LABEL, CANDIDATE_LABEL].iter().any(|label| {
        let name = label.trim_end_matches('：');
        line.starts_with(label) || line.starts_with(&format!("{}:", name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_names_both_labels() {
        let prompt = build_speaker_system_prompt();
        assert!(prompt.contains(INTERVIEWER_LABEL));
        assert!(prompt.contains(CANDIDATE_LABEL));
    }

    #[test]
    fn test_user_prompt_contains_transcript() {
        let prompt = build_speaker_user_prompt("tell me about yourself");
        assert!(prompt.contains("tell me about yourself"));
    }

    #[test]
    fn test_has_speaker_label() {
        assert!(has_speaker_label("面试官：请介绍一下你自己"));
        assert!(has_speaker_label("  候选人:好的"));
        assert!(!has_speaker_label("请介绍一下你自己"));
        assert!(!has_speaker_label(""));
    }
}
