//! Configuration module for kikk.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts, TranslatePrompts, GROUNDING_INSTRUCTION};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, HistorySettings, LlmSettings,
    PromptSettings, RetrievalSettings, ServerSettings, Settings, YoutubeSettings,
};
