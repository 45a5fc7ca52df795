use std::time::Duration;

use anyhow::{Result, ensure};
use tracing::{info, warn};

use crate::llm::LlmClient;
use crate::models::{AggregateResult, ChunkAnalysisResult, ChunkConfig, RubricTable};
use crate::stages::{
    AnalyzerConfig, SpeakerConfig, analyze_chunk_tracked, apply_rubric, attribute_speakers,
    merge_results, plan_chunks,
};

/// Configuration for a full transcript analysis
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub chunking: ChunkConfig,
    pub analyzer: AnalyzerConfig,
    pub speakers: SpeakerConfig,
    /// Pause between consecutive chunk calls
    pub inter_call_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkConfig::default(),
            analyzer: AnalyzerConfig::default(),
            speakers: SpeakerConfig::default(),
            inter_call_delay: Duration::from_secs(1),
        }
    }
}

impl PipelineConfig {
    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.chunking.max_chunk_chars > 0,
            "max chunk size must be greater than zero"
        );
        ensure!(
            self.chunking.multi_chunk_threshold > 0,
            "multi-chunk threshold must be greater than zero"
        );
        ensure!(
            !self.analyzer.call_timeout.is_zero(),
            "analysis call timeout must be greater than zero"
        );
        Ok(())
    }
}

/// Result of a full transcript analysis
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AggregateResult,
    /// Characters in the transcript that was chunked
    pub transcript_chars: usize,
    pub chunk_count: usize,
    /// Chunks that contributed nothing because their call or parse failed
    pub chunks_failed: usize,
    pub multi_chunk: bool,
    pub speakers_attributed: bool,
    pub questions_enriched: usize,
}

/// Analyze an interview transcript of any length.
///
/// Speaker attribution runs first. Transcripts over the multi-chunk
/// threshold are split and each chunk is analyzed in order, one call at a
/// time with `inter_call_delay` between calls, then merged. A failed
/// chunk contributes an empty result; only an invalid configuration
/// is an error.
pub async fn analyze_transcript(
    client: &dyn LlmClient,
    transcript: &str,
    rubric: Option<&RubricTable>,
    config: &PipelineConfig,
) -> Result<AnalysisOutcome> {
    config.validate()?;

    let labeled = attribute_speakers(client, transcript, &config.speakers).await;
    let speakers_attributed = labeled != transcript;

    let plan = plan_chunks(&labeled, &config.chunking);
    let chunk_count = plan.len();
    let mut chunks_failed = 0;
    let mut results: Vec<ChunkAnalysisResult> = Vec::with_capacity(chunk_count);

    for chunk in &plan.chunks {
        let (result, ok) = analyze_chunk_tracked(
            client,
            &chunk.text,
            chunk.index,
            chunk.total,
            &config.analyzer,
        )
        .await;
        if !ok {
            chunks_failed += 1;
        }
        results.push(result);

        if chunk.index < chunk.total && !config.inter_call_delay.is_zero() {
            tokio::time::sleep(config.inter_call_delay).await;
        }
    }

    let mut result = if plan.multi_chunk {
        merge_results(&results)
    } else {
        results
            .pop()
            .map(AggregateResult::from_single)
            .unwrap_or_default()
    };

    let questions_enriched = match rubric {
        Some(rubric) => apply_rubric(&mut result, rubric),
        None => 0,
    };

    if chunks_failed > 0 {
        warn!("{} of {} chunks failed", chunks_failed, chunk_count);
    }
    info!(
        "Analysis complete: {} strengths, {} weaknesses, {} suggestions, {} questions",
        result.strengths.len(),
        result.weaknesses.len(),
        result.suggestions.len(),
        result.question_analysis.len()
    );

    Ok(AnalysisOutcome {
        result,
        transcript_chars: labeled.chars().count(),
        chunk_count,
        chunks_failed,
        multi_chunk: plan.multi_chunk,
        speakers_attributed,
        questions_enriched,
    })
}
