//! Configuration settings for kikk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub youtube: YoutubeSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub history: HistorySettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.kikk".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// YouTube transcript retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Base URL for watch pages.
    pub base_url: String,
    /// Transcript language tried before falling back to the first listed track.
    pub preferred_language: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            preferred_language: "en".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat-completion model settings (used for translation and answering).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemma-3-12b-it:free".to_string(),
            temperature: 0.2,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Base URL of an OpenAI-compatible embeddings API.
    pub base_url: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Texts per embeddings request.
    pub batch_size: usize,
    /// Maximum embeddings requests in flight.
    pub max_concurrent: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            api_key_env: "OPENAI_API_KEY".to_string(),
            batch_size: 100,
            max_concurrent: 4,
        }
    }
}

/// Text chunking settings (sizes in characters).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks placed in the prompt.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Q&A history persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Path to the SQLite database.
    pub sqlite_path: String,
    /// Fail the request when the answer cannot be persisted.
    pub require_persist: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            sqlite_path: "~/.kikk/history.db".to_string(),
            require_persist: false,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::KikkError;

        if self.chunking.chunk_size == 0 {
            return Err(KikkError::Config("chunking.chunk_size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(KikkError::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(KikkError::Config("retrieval.top_k must be positive".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(KikkError::Config(format!(
                "llm.temperature must be within 0.0-2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.embedding.batch_size == 0 || self.embedding.max_concurrent == 0 {
            return Err(KikkError::Config(
                "embedding.batch_size and embedding.max_concurrent must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::KikkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kikk")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded history database path.
    pub fn history_path(&self) -> PathBuf {
        Self::expand_path(&self.history.sqlite_path)
    }
}
