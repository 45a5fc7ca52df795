use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::models::{Criteria, RubricTable};

/// JSON request body carrying a transcript
#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub transcript: String,
}

/// Read a transcript from a text file, or from a `.json` file holding a
/// [`TranscriptRequest`]. Line endings are normalized to `\n`.
pub fn read_transcript_file(path: &Path) -> Result<String> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let transcript = if is_json {
        parse_transcript_request(&content)?
    } else {
        content
    };

    let transcript = normalize_line_endings(&transcript);
    if transcript.trim().is_empty() {
        bail!("Transcript in {:?} is empty", path);
    }
    Ok(transcript)
}

/// Parse a `{ "transcript": "..." }` request body
pub fn parse_transcript_request(json: &str) -> Result<String> {
    let request: TranscriptRequest =
        serde_json::from_str(json).context("Failed to parse transcript request JSON")?;
    Ok(request.transcript)
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Load rubric criteria from a JSON object keyed by question type, layered
/// over the built-in rubric table.
pub fn read_rubric_file(path: &Path) -> Result<RubricTable> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let overrides: HashMap<String, Criteria> =
        serde_json::from_str(&content).context("Failed to parse rubric JSON")?;

    let mut table = RubricTable::default();
    table.extend(overrides);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_text_transcript_normalizes_crlf() {
        let file = write_temp(".txt", "Interviewer: hi\r\nCandidate: hello\r\n");
        let transcript = read_transcript_file(file.path()).unwrap();
        assert_eq!(transcript, "Interviewer: hi\nCandidate: hello\n");
    }

    #[test]
    fn test_read_json_transcript() {
        let file = write_temp(".json", r#"{"transcript": "面试官：你好\n候选人：你好"}"#);
        let transcript = read_transcript_file(file.path()).unwrap();
        assert_eq!(transcript, "面试官：你好\n候选人：你好");
    }

    #[test]
    fn test_blank_transcript_is_rejected() {
        let file = write_temp(".txt", "  \n\n ");
        assert!(read_transcript_file(file.path()).is_err());
    }

    #[test]
    fn test_json_without_transcript_is_rejected() {
        assert!(parse_transcript_request(r#"{"text": "hi"}"#).is_err());
    }

    #[test]
    fn test_read_rubric_file_layers_over_defaults() {
        let file = write_temp(
            ".json",
            r#"{"frontend": {"name": "Frontend", "focusAreas": ["accessibility"]}}"#,
        );
        let table = read_rubric_file(file.path()).unwrap();

        assert_eq!(table.lookup("frontend").unwrap().name, "Frontend");
        assert_eq!(table.lookup("technical").unwrap().name, "Technical Knowledge");
    }
}
