pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use io::{AnalysisReport, HumanReport, read_rubric_file, read_transcript_file};
pub use llm::{AnthropicClient, AnthropicConfig, LlmClient};
pub use models::{AggregateResult, ChunkAnalysisResult, ChunkConfig, RubricTable};
pub use pipeline::{AnalysisOutcome, PipelineConfig, analyze_transcript};
pub use stages::{
    AnalyzerConfig, SpeakerConfig, analyze_chunk, attribute_speakers, chunk_transcript,
    merge_results, plan_chunks,
};
