//! RAG (Retrieval-Augmented Generation) over a single transcript.
//!
//! The retriever picks the chunks most similar to the question; the composer turns
//! them into a prompt that restricts the model to that context.

pub mod context;
mod prompt;

pub use context::{format_context_for_prompt, Retriever, ScoredChunk};
pub use prompt::PromptComposer;
