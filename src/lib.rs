//! kikk - Ask questions about YouTube videos
//!
//! Answers questions about a video from its own transcript. The name "kikk" is
//! Norwegian for "peek."
//!
//! # Overview
//!
//! For one request kikk will:
//! - Extract the video ID from a YouTube URL
//! - Fetch the English transcript, or the first listed track when there is none
//! - Translate non-English transcripts into English
//! - Split the transcript into overlapping chunks and retrieve the most relevant ones
//! - Ask a chat model to answer only from that context
//! - Record the question and answer in a history store
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `youtube` - Video URL parsing
//! - `transcript` - Caption track listing, download and language fallback
//! - `translate` - Translation of transcripts into English
//! - `chunking` - Recursive character chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Ephemeral similarity index
//! - `rag` - Context retrieval and prompt composition
//! - `llm` - Chat completion client
//! - `history` - Q&A history persistence
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use kikk::config::Settings;
//! use kikk::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let outcome = orchestrator
//!         .summarize("https://www.youtube.com/watch?v=dQw4w9WgXcQ", None, None)
//!         .await?;
//!     println!("{}", outcome.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod history;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod transcript;
pub mod translate;
pub mod vector_store;
pub mod youtube;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{KikkError, Result};
