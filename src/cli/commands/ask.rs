//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    video_url: &str,
    question: Option<&str>,
    user_id: Option<&str>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Reading transcript and asking the model...");

    match orchestrator.summarize(video_url, question, user_id).await {
        Ok(outcome) => {
            spinner.finish_and_clear();

            if outcome.translated {
                Output::info(&format!(
                    "Transcript translated from '{}' to English",
                    outcome.language_code
                ));
            }

            println!("\n{}\n", outcome.answer);

            if !outcome.sources.is_empty() {
                Output::header("Context");
                for source in &outcome.sources {
                    Output::passage(source.chunk.ordinal, source.score, &source.chunk.content);
                }
            }

            if outcome.record.is_none() {
                Output::warning("The answer could not be saved to history.");
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
