use thiserror::Error;

use crate::models::ChunkAnalysisResult;

/// Why model output could not be read as an analysis
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model output is empty")]
    Empty,
    #[error("model output is not a valid analysis object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Locate the JSON object inside model output.
///
/// Strips a surrounding markdown code fence and any prose outside the
/// outermost braces.
pub fn extract_json_object(text: &str) -> &str {
    let mut trimmed = text.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // Skip an optional language tag such as "json"
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            trimmed = content[..end].trim();
        }
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parse model output into a chunk analysis
pub fn parse_chunk_analysis(text: &str) -> Result<ChunkAnalysisResult, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let json = extract_json_object(text);
    Ok(serde_json::from_str(json)?)
}
