use serde::Serialize;

/// Configuration for transcript chunking
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum chunk length in characters
    pub max_chunk_chars: usize,
    /// Transcripts longer than this (in characters) are analyzed chunk by chunk
    pub multi_chunk_threshold: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 10_000,
            multi_chunk_threshold: 15_000,
        }
    }
}

/// A contiguous slice of transcript lines sent to the model in one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// 1-based position of this chunk
    pub index: usize,
    /// Number of chunks the transcript was split into
    pub total: usize,
    pub text: String,
}

impl Chunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Ordered chunks produced for one transcript
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    pub chunks: Vec<Chunk>,
    /// True when the transcript exceeded the multi-chunk threshold
    pub multi_chunk: bool,
    /// Number of chunks longer than the configured maximum
    pub oversized: usize,
}

impl ChunkPlan {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
