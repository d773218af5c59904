//! OpenAI-compatible chat completions.

use super::ChatClient;
use crate::config::LlmSettings;
use crate::error::{KikkError, Result};
use crate::openai::{api_key_from_env, create_client};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chat client for any OpenAI-compatible endpoint (OpenAI, OpenRouter, ...).
pub struct OpenAIChatClient {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIChatClient {
    /// Create a client from settings, reading the API key from the configured variable.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        Self::with_config(
            &settings.base_url,
            &api_key_from_env(&settings.api_key_env),
            &settings.model,
            settings.temperature,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Create a client with explicit connection details.
    pub fn with_config(
        base_url: &str,
        api_key: &str,
        model: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client(base_url, api_key, timeout)?,
            model: model.to_string(),
            temperature,
        })
    }

    /// Sampling temperature sent with every request.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| KikkError::Llm(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| KikkError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| KikkError::Llm(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| KikkError::Llm("Empty response from LLM".to_string()))?;

        debug!("Received {} chars from {}", answer.len(), self.model);
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
