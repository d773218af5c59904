//! Chat-completion clients.

mod openai;

pub use openai::OpenAIChatClient;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for chat-completion models.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a single prompt and return the model's text response.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model behind this client.
    fn model(&self) -> &str;
}
