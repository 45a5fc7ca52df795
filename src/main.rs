use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use debrief::{
    analyze_transcript, plan_chunks, read_rubric_file, read_transcript_file, AnalysisReport,
    AnthropicClient, AnthropicConfig, ChunkConfig, HumanReport, PipelineConfig, RubricTable,
};

#[derive(Parser)]
#[command(name = "debrief")]
#[command(author, version, about = "Interview transcript evaluation pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an interview transcript
    Analyze {
        /// Input transcript (plain text, or JSON with a "transcript" field)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the machine-readable report (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the human-readable report (text)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Rubric criteria (JSON) layered over the built-in rubric
        #[arg(long)]
        rubric: Option<PathBuf>,

        /// Skip the per-question rubric feedback
        #[arg(long)]
        no_rubric: bool,

        /// Do not label speakers before analysis
        #[arg(long)]
        no_speaker_attribution: bool,

        /// Maximum chunk size in characters
        #[arg(long, default_value = "10000")]
        chunk_size: usize,

        /// Transcripts longer than this many characters are analyzed in chunks
        #[arg(long, default_value = "15000")]
        threshold: usize,

        /// Delay between chunk calls in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,

        /// Timeout for each analysis call in seconds
        #[arg(long, default_value = "120")]
        timeout_secs: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how a transcript would be chunked, without calling the model
    Chunk {
        /// Input transcript (plain text, or JSON with a "transcript" field)
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum chunk size in characters
        #[arg(long, default_value = "10000")]
        chunk_size: usize,

        /// Transcripts longer than this many characters are analyzed in chunks
        #[arg(long, default_value = "15000")]
        threshold: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            report,
            rubric,
            no_rubric,
            no_speaker_attribution,
            chunk_size,
            threshold,
            delay_ms,
            timeout_secs,
            verbose,
        } => {
            setup_logging(verbose);

            let mut config = PipelineConfig {
                chunking: ChunkConfig {
                    max_chunk_chars: chunk_size,
                    multi_chunk_threshold: threshold,
                },
                inter_call_delay: Duration::from_millis(delay_ms),
                ..Default::default()
            };
            config.analyzer.call_timeout = Duration::from_secs(timeout_secs);
            config.speakers.enabled = !no_speaker_attribution;

            let rubric = match (no_rubric, rubric) {
                (true, _) => None,
                (false, Some(path)) => Some(read_rubric_file(&path)?),
                (false, None) => Some(RubricTable::default()),
            };

            run_analysis(input, output, report, rubric, config).await
        }
        Commands::Chunk {
            input,
            chunk_size,
            threshold,
            verbose,
        } => {
            setup_logging(verbose);
            show_chunks(
                input,
                ChunkConfig {
                    max_chunk_chars: chunk_size,
                    multi_chunk_threshold: threshold,
                },
            )
        }
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_analysis(
    input: PathBuf,
    output: PathBuf,
    report_path: Option<PathBuf>,
    rubric: Option<RubricTable>,
    config: PipelineConfig,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let transcript = read_transcript_file(&input).context("Failed to load input transcript")?;
    info!(
        "Loaded {} chars, {} lines",
        transcript.chars().count(),
        transcript.lines().count()
    );

    let api_config = AnthropicConfig::from_env()?;
    let client = AnthropicClient::new(api_config);

    let outcome = analyze_transcript(&client, &transcript, rubric.as_ref(), &config).await?;

    let report = AnalysisReport::from_outcome(outcome);
    report.write_json(&output)?;
    info!("Report written to {:?}", output);

    if let Some(path) = report_path {
        HumanReport::new(&report).write_file(&path)?;
        info!("Human-readable report written to {:?}", path);
    }

    info!(
        "Complete: {} chunks ({} failed), {} high-priority items",
        report.metadata.chunk_count,
        report.metadata.chunks_failed,
        report.result.high_priority_count()
    );

    Ok(())
}

fn show_chunks(input: PathBuf, config: ChunkConfig) -> Result<()> {
    anyhow::ensure!(config.max_chunk_chars > 0, "chunk size must be greater than zero");

    let transcript = read_transcript_file(&input).context("Failed to load input transcript")?;
    let plan = plan_chunks(&transcript, &config);

    println!("Chunk Plan");
    println!("==========");
    println!("Transcript chars: {}", transcript.chars().count());
    println!(
        "Mode: {}",
        if plan.multi_chunk {
            "multi-chunk"
        } else {
            "single call"
        }
    );
    println!("Chunks: {}", plan.len());
    println!("Oversized: {}", plan.oversized);
    println!();

    for chunk in &plan.chunks {
        let chars = chunk.char_len();
        let first_line = chunk
            .text
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("");
        let preview: String = first_line.chars().take(60).collect();
        println!(
            "{}/{}: {} chars, {} lines{}  | {}",
            chunk.index,
            chunk.total,
            chars,
            chunk.text.lines().count(),
            if chars > config.max_chunk_chars {
                " (oversized)"
            } else {
                ""
            },
            preview
        );
    }

    Ok(())
}
