use tracing::{debug, info, warn};

use crate::models::{Chunk, ChunkConfig, ChunkPlan};

/// Lines accumulated for the chunk being built
#[derive(Default)]
struct LineBuffer {
    text: String,
    chars: usize,
    lines: usize,
}

impl LineBuffer {
    /// Whether `line_chars` more characters (plus a separator) stay within `max`
    fn fits(&self, line_chars: usize, max: usize) -> bool {
        self.chars + usize::from(self.lines > 0) + line_chars <= max
    }

    fn push(&mut self, line: &str, line_chars: usize) {
        if self.lines > 0 {
            self.text.push('\n');
            self.chars += 1;
        }
        self.text.push_str(line);
        self.chars += line_chars;
        self.lines += 1;
    }

    fn take(&mut self) -> String {
        self.chars = 0;
        self.lines = 0;
        std::mem::take(&mut self.text)
    }
}

/// Characters a run of blank lines occupies ahead of a following line
fn blank_run_chars(blanks: &[&str]) -> usize {
    blanks.iter().map(|b| b.chars().count() + 1).sum()
}

/// Split a transcript into ordered chunks on line boundaries.
///
/// Lines are packed greedily: a chunk is closed as soon as the next line
/// (plus its newline separator) would push it past `max_chunk_chars`.
/// Lines are never split, so a single line longer than the limit becomes
/// its own oversized chunk.
///
/// Blank lines never form a chunk of their own. A blank run that falls on a
/// chunk boundary fills the closing chunk first, then leads the next one;
/// blank lines that fit in neither are dropped. Otherwise joining the
/// returned chunks with `\n` reproduces the trimmed transcript exactly.
/// A blank transcript yields no chunks.
pub fn chunk_transcript(transcript: &str, max_chunk_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = LineBuffer::default();
    let mut blanks: Vec<&str> = Vec::new();

    // Trimming guarantees the last line has content, so no blank run is left over
    for line in transcript.trim().split('\n') {
        if line.trim().is_empty() {
            blanks.push(line);
            continue;
        }

        let line_chars = line.chars().count();
        let mut kept = 0;

        if buffer.lines > 0
            && buffer.chars + blank_run_chars(&blanks) + 1 + line_chars > max_chunk_chars
        {
            while kept < blanks.len() {
                let blank = blanks[kept];
                let blank_chars = blank.chars().count();
                if !buffer.fits(blank_chars, max_chunk_chars) {
                    break;
                }
                buffer.push(blank, blank_chars);
                kept += 1;
            }
            chunks.push(buffer.take());

            let carried = blanks.len() - kept;
            while kept < blanks.len()
                && blank_run_chars(&blanks[kept..]) + line_chars > max_chunk_chars
            {
                kept += 1;
            }
            let dropped = carried - (blanks.len() - kept);
            if dropped > 0 {
                debug!(
                    "Dropped {} blank lines at the boundary of chunk {}",
                    dropped,
                    chunks.len()
                );
            }
        }

        for blank in &blanks[kept..] {
            buffer.push(blank, blank.chars().count());
        }
        blanks.clear();
        buffer.push(line, line_chars);
    }

    if buffer.lines > 0 {
        chunks.push(buffer.take());
    }

    chunks
}

/// Decide how a transcript is sent to the model.
///
/// Transcripts of at most `multi_chunk_threshold` characters go out whole
/// as a single chunk; longer ones are split with [`chunk_transcript`].
pub fn plan_chunks(transcript: &str, config: &ChunkConfig) -> ChunkPlan {
    let length = transcript.chars().count();

    if length <= config.multi_chunk_threshold {
        debug!(
            "Transcript is {} chars (threshold {}), analyzing in one call",
            length, config.multi_chunk_threshold
        );
        return ChunkPlan {
            chunks: vec![Chunk {
                index: 1,
                total: 1,
                text: transcript.trim().to_string(),
            }],
            multi_chunk: false,
            oversized: 0,
        };
    }

    let texts = chunk_transcript(transcript, config.max_chunk_chars);
    let total = texts.len();
    let chunks: Vec<Chunk> = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            index: i + 1,
            total,
            text,
        })
        .collect();

    let mut oversized = 0;
    for chunk in &chunks {
        let chars = chunk.char_len();
        if chars > config.max_chunk_chars {
            oversized += 1;
            warn!(
                "Chunk {}/{} is {} chars, over the {} char limit (contains an unbroken line)",
                chunk.index, chunk.total, chars, config.max_chunk_chars
            );
        }
    }

    info!(
        "Transcript is {} chars, split into {} chunks of at most {} chars",
        length, total, config.max_chunk_chars
    );

    ChunkPlan {
        chunks,
        multi_chunk: true,
        oversized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transcript(lines: usize) -> String {
        (0..lines)
            .map(|i| {
                let speaker = if i % 2 == 0 { "Interviewer" } else { "Candidate" };
                format!("{}: line {} {}", speaker, i, "x".repeat(i % 37))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_chunks_are_lossless() {
        let transcript = format!("\n  {}\n\n", sample_transcript(120));
        for max in [40, 100, 333, 5_000] {
            let chunks = chunk_transcript(&transcript, max);
            assert_eq!(chunks.join("\n"), transcript.trim(), "max {}", max);
        }
    }

    #[test]
    fn test_chunks_respect_size_bound() {
        let transcript = sample_transcript(200);
        let chunks = chunk_transcript(&transcript, 120);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 120, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn test_oversized_line_forms_own_chunk() {
        let long_line = "y".repeat(50);
        let transcript = format!("short one\n{}\nshort two", long_line);
        let chunks = chunk_transcript(&transcript, 20);

        assert_eq!(chunks, vec!["short one", long_line.as_str(), "short two"]);
    }

    #[test]
    fn test_no_newlines_gives_single_chunk() {
        let transcript = "z".repeat(500);
        let chunks = chunk_transcript(&transcript, 100);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 500);
    }

    #[test]
    fn test_blank_lines_do_not_form_chunks() {
        let chunks = chunk_transcript("first\n\n\n\nsecond line here", 5);
        assert_eq!(chunks, vec!["first", "second line here"]);
    }

    #[test]
    fn test_blank_run_across_boundary_is_kept_when_it_fits() {
        let transcript = "first\n\nsecond\n\nthird";
        let chunks = chunk_transcript(transcript, 14);
        assert_eq!(chunks, vec!["first\n\nsecond\n", "third"]);
        assert_eq!(chunks.join("\n"), transcript);
    }

    #[test]
    fn test_blank_run_at_boundary_respects_size_bound() {
        let chunks = chunk_transcript("aaaaaaaaa\n\n\n\n\n\nbbbbbbbbb", 10);
        assert_eq!(chunks, vec!["aaaaaaaaa\n", "\nbbbbbbbbb"]);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10, "chunk too long: {:?}", chunk);
        }
    }

    #[test]
    fn test_size_bound_holds_with_blank_runs() {
        let transcript = (0..400)
            .map(|i| {
                if i % 7 < 3 {
                    " ".repeat(i % 2)
                } else {
                    "w".repeat(i % 23 + 1)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        let content = |text: &str| -> Vec<String> {
            text.split('\n')
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect()
        };

        for max in [5, 12, 24, 60, 200] {
            let chunks = chunk_transcript(&transcript, max);
            for chunk in &chunks {
                let has_long_line = chunk.split('\n').any(|l| l.chars().count() > max);
                assert!(
                    chunk.chars().count() <= max || has_long_line,
                    "max {}: chunk of {} chars",
                    max,
                    chunk.chars().count()
                );
                assert!(!chunk.trim().is_empty());
            }
            assert_eq!(content(&chunks.join("\n")), content(&transcript), "max {}", max);
        }
    }

    #[test]
    fn test_blank_transcript_gives_no_chunks() {
        assert!(chunk_transcript("", 100).is_empty());
        assert!(chunk_transcript(" \n \n", 100).is_empty());
    }

    #[test]
    fn test_smaller_limit_never_gives_fewer_chunks() {
        let transcript = sample_transcript(300);
        let mut previous = usize::MAX;
        for max in [30, 60, 120, 250, 1_000, 10_000] {
            let count = chunk_transcript(&transcript, max).len();
            assert!(count <= previous, "max {} gave {} > {}", max, count, previous);
            previous = count;
        }
    }

    #[test]
    fn test_multibyte_text_counted_in_chars() {
        let line = "面试官：请介绍一下你自己";
        let transcript = vec![line; 4].join("\n");
        let per_line = line.chars().count();
        let chunks = chunk_transcript(&transcript, per_line * 2 + 1);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_plan_threshold_is_strict() {
        let config = ChunkConfig::default();

        let at_threshold = "a\n".repeat(7_500);
        assert_eq!(at_threshold.chars().count(), 15_000);
        let plan = plan_chunks(&at_threshold, &config);
        assert!(!plan.multi_chunk);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.chunks[0].total, 1);

        let over_threshold = format!("{}b", at_threshold);
        let plan = plan_chunks(&over_threshold, &config);
        assert!(plan.multi_chunk);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_plan_twenty_thousand_chars_gives_two_chunks() {
        let transcript = format!("{}\n", vec!["q".repeat(99); 200].join("\n"));
        assert_eq!(transcript.chars().count(), 20_000);

        let plan = plan_chunks(&transcript, &ChunkConfig::default());
        assert!(plan.multi_chunk);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.oversized, 0);
        assert_eq!((plan.chunks[0].index, plan.chunks[0].total), (1, 2));
        assert_eq!((plan.chunks[1].index, plan.chunks[1].total), (2, 2));
    }

    #[test]
    fn test_plan_counts_oversized_chunks() {
        let config = ChunkConfig {
            max_chunk_chars: 100,
            multi_chunk_threshold: 150,
        };
        let transcript = format!("intro\n{}\noutro", "w".repeat(300));
        let plan = plan_chunks(&transcript, &config);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.oversized, 1);
    }
}
