//! History command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::history::{HistoryStore, SqliteHistoryStore};
use anyhow::Result;

/// Run the history command.
pub async fn run_history(
    limit: Option<usize>,
    user_id: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let store = SqliteHistoryStore::new(&settings.history_path())?;

    match store.list(user_id, limit).await {
        Ok(records) => {
            if records.is_empty() {
                Output::info("No questions answered yet. Use 'kikk ask <video_url>' to ask one.");
            } else {
                Output::header(&format!("History ({})", records.len()));

                for record in &records {
                    Output::qa_record(record);
                }
                println!();
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to read history: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
