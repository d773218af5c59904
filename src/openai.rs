//! OpenAI-compatible client configuration.
//!
//! Chat and embeddings may live behind different providers (e.g. OpenRouter for chat,
//! OpenAI for embeddings), so every client is built from an explicit base URL and key.

use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for provider requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for an OpenAI-compatible API.
pub fn create_client(api_base: &str, api_key: &str, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = OpenAIConfig::new()
        .with_api_base(api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Read an API key from the named environment variable, empty if unset.
pub fn api_key_from_env(var: &str) -> String {
    std::env::var(var).unwrap_or_default()
}
