//! Transcript translation into English.

use crate::config::Prompts;
use crate::error::{KikkError, Result};
use crate::llm::ChatClient;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Rewrites non-English transcripts into English with one chat call.
pub struct Translator {
    chat: Arc<dyn ChatClient>,
    prompts: Prompts,
}

impl Translator {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self {
            chat,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Whether a language code denotes English ("en", "en-US", "en_GB", ...).
    pub fn is_english(language_code: &str) -> bool {
        let code = language_code.trim().to_ascii_lowercase();
        code == "en" || code.starts_with("en-") || code.starts_with("en_")
    }

    /// Return `text` in English.
    ///
    /// English input is returned unchanged without calling the model. Anything else is
    /// sent whole in a single request; the trimmed response replaces the text.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn to_english(&self, text: &str, language_code: &str) -> Result<String> {
        if Self::is_english(language_code) {
            debug!("Transcript already in English, skipping translation");
            return Ok(text.to_string());
        }

        info!("Translating {} transcript to English", language_code);

        let mut vars = HashMap::new();
        vars.insert("language".to_string(), language_code.to_string());
        vars.insert("text".to_string(), text.to_string());
        let prompt = self.prompts.render_with_custom(&self.prompts.translate.template, &vars);

        let translated = self.chat.complete(&prompt).await?.trim().to_string();
        if translated.is_empty() {
            return Err(KikkError::Llm("Translation returned no text".to_string()));
        }

        Ok(translated)
    }
}
