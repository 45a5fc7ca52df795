use std::time::Duration;

use tracing::{debug, info, warn};

use crate::llm::{
    CompletionRequest, LlmClient, build_speaker_system_prompt, build_speaker_user_prompt,
    has_speaker_label,
};

/// Configuration for the speaker attribution stage
#[derive(Debug, Clone)]
pub struct SpeakerConfig {
    /// Run the stage at all
    pub enabled: bool,
    /// Skip the model call when every line already carries a speaker label
    pub skip_if_labeled: bool,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Upper bound on the model call
    pub call_timeout: Duration,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_if_labeled: true,
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 8192,
            temperature: 0.1,
            call_timeout: Duration::from_secs(180),
        }
    }
}

/// Whether every non-blank line already starts with a speaker label
pub fn is_speaker_labeled(transcript: &str) -> bool {
    let mut lines = transcript.lines().filter(|l| !l.trim().is_empty()).peekable();
    lines.peek().is_some() && lines.all(has_speaker_label)
}

/// Rewrite an unlabeled transcript as interviewer/candidate dialogue.
///
/// Best effort: on any failure the original transcript is returned unchanged.
pub async fn attribute_speakers(
    client: &dyn LlmClient,
    transcript: &str,
    config: &SpeakerConfig,
) -> String {
    if !config.enabled {
        debug!("Speaker attribution disabled");
        return transcript.to_string();
    }
    if config.skip_if_labeled && is_speaker_labeled(transcript) {
        info!("Transcript already has speaker labels, skipping attribution");
        return transcript.to_string();
    }

    let request = CompletionRequest {
        model: config.model.clone(),
        system_prompt: build_speaker_system_prompt(),
        user_prompt: build_speaker_user_prompt(transcript),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        json_response: false,
    };

    let completion = match tokio::time::timeout(config.call_timeout, client.complete(request)).await
    {
        Ok(Ok(completion)) => completion,
        Ok(Err(e)) => {
            warn!("Speaker attribution failed, using original transcript: {}", e);
            return transcript.to_string();
        }
        Err(_) => {
            warn!(
                "Speaker attribution timed out after {:?}, using original transcript",
                config.call_timeout
            );
            return transcript.to_string();
        }
    };

    if completion.truncated {
        warn!("Speaker attribution output was truncated, using original transcript");
        return transcript.to_string();
    }

    let labeled = completion.text.trim();
    let labeled_lines = labeled.lines().filter(|l| has_speaker_label(l)).count();
    if labeled_lines == 0 {
        warn!("Speaker attribution returned no labeled lines, using original transcript");
        return transcript.to_string();
    }

    info!("Speaker attribution labeled {} lines", labeled_lines);
    labeled.to_string()
}
