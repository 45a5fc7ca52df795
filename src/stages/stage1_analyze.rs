use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{
    CompletionRequest, LlmClient, LlmError, ParseError, build_analysis_system_prompt,
    build_analysis_user_prompt, parse_chunk_analysis,
};
use crate::models::ChunkAnalysisResult;

/// Configuration for chunk analysis
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Model used when the whole transcript fits in one call
    pub single_chunk_model: String,
    /// Model used for each part of a split transcript
    pub multi_chunk_model: String,
    pub single_chunk_max_tokens: u32,
    pub multi_chunk_max_tokens: u32,
    pub temperature: f64,
    /// Upper bound on each model call
    pub call_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            single_chunk_model: "claude-3-5-haiku-latest".to_string(),
            multi_chunk_model: "claude-sonnet-4-20250514".to_string(),
            single_chunk_max_tokens: 2000,
            multi_chunk_max_tokens: 4000,
            temperature: 0.3,
            call_timeout: Duration::from_secs(120),
        }
    }
}

/// Why a chunk produced no analysis
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Build the model request for chunk `index` of `total`
pub fn build_chunk_request(
    chunk_text: &str,
    index: usize,
    total: usize,
    config: &AnalyzerConfig,
) -> CompletionRequest {
    let (model, max_tokens) = if total > 1 {
        (&config.multi_chunk_model, config.multi_chunk_max_tokens)
    } else {
        (&config.single_chunk_model, config.single_chunk_max_tokens)
    };

    CompletionRequest {
        model: model.clone(),
        system_prompt: build_analysis_system_prompt(index, total),
        user_prompt: build_analysis_user_prompt(chunk_text, index, total),
        temperature: config.temperature,
        max_tokens,
        json_response: true,
    }
}

/// Analyze one chunk, reporting why it failed if it did
pub async fn try_analyze_chunk(
    client: &dyn LlmClient,
    chunk_text: &str,
    index: usize,
    total: usize,
    config: &AnalyzerConfig,
) -> Result<ChunkAnalysisResult, ChunkError> {
    let request = build_chunk_request(chunk_text, index, total, config);
    debug!(
        "Chunk {}/{}: {} chars to {}",
        index,
        total,
        chunk_text.chars().count(),
        request.model
    );

    let completion = tokio::time::timeout(config.call_timeout, client.complete(request))
        .await
        .map_err(|_| ChunkError::Timeout(config.call_timeout))??;

    if completion.truncated {
        warn!(
            "Chunk {}/{}: model output hit the token limit, JSON may be incomplete",
            index, total
        );
    }

    let result = parse_chunk_analysis(&completion.text)?;
    info!(
        "Chunk {}/{}: {} strengths, {} weaknesses, {} suggestions, {} questions",
        index,
        total,
        result.strengths.len(),
        result.weaknesses.len(),
        result.suggestions.len(),
        result.question_analysis.len()
    );
    Ok(result)
}

/// Analyze one chunk, degrading any failure to [`ChunkAnalysisResult::empty`].
///
/// The flag is `false` when the chunk failed and contributed nothing.
pub async fn analyze_chunk_tracked(
    client: &dyn LlmClient,
    chunk_text: &str,
    index: usize,
    total: usize,
    config: &AnalyzerConfig,
) -> (ChunkAnalysisResult, bool) {
    match try_analyze_chunk(client, chunk_text, index, total, config).await {
        Ok(result) => (result, true),
        Err(e) => {
            warn!("Chunk {}/{} failed, contributing nothing: {}", index, total, e);
            (ChunkAnalysisResult::empty(), false)
        }
    }
}

/// Analyze one chunk.
///
/// Never fails: any error degrades to [`ChunkAnalysisResult::empty`].
pub async fn analyze_chunk(
    client: &dyn LlmClient,
    chunk_text: &str,
    index: usize,
    total: usize,
    config: &AnalyzerConfig,
) -> ChunkAnalysisResult {
    analyze_chunk_tracked(client, chunk_text, index, total, config)
        .await
        .0
}
