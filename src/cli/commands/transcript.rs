//! Transcript command implementation.

use crate::cli::{format_duration, Output};
use crate::config::Settings;
use crate::transcript::{TranscriptAcquirer, YoutubeTranscriptSource};
use crate::youtube::VideoReference;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Run the transcript command.
///
/// Needs no API keys: only the caption provider is contacted.
pub async fn run_transcript(video_url: &str, settings: Settings) -> Result<()> {
    let video = VideoReference::parse(video_url)
        .ok_or_else(|| anyhow::anyhow!("Invalid YouTube URL: {}", video_url))?;

    let source = YoutubeTranscriptSource::with_config(
        &settings.youtube.base_url,
        Duration::from_secs(settings.youtube.timeout_secs),
    )?;
    let acquirer = TranscriptAcquirer::with_language(Arc::new(source), &settings.youtube.preferred_language);

    let spinner = Output::spinner("Fetching transcript...");
    let result = acquirer.acquire(&video.video_id).await;
    spinner.finish_and_clear();

    match result {
        Ok(transcript) => {
            Output::header(&format!("Transcript for {}", video.video_id));
            Output::kv("Video", &video.watch_url());
            Output::kv("Language", &transcript.language_code);
            Output::kv(
                "Kind",
                if transcript.is_generated {
                    "auto-generated"
                } else {
                    "manual"
                },
            );
            Output::kv("Duration", &format_duration(transcript.duration_seconds()));
            Output::kv("Segments", &transcript.segments.len().to_string());
            println!("\n{}", transcript.text);
        }
        Err(e) => {
            Output::error(&format!("No transcript available: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
