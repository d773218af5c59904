//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{KikkError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Answering a question requires chat and embedding API keys.
    Ask,
    /// Serving requires the same keys, but requests can still report failures.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask | Operation::Serve => {
            check_api_key(&settings.llm.api_key_env)?;
            check_api_key(&settings.embedding.api_key_env)?;
        }
    }
    Ok(())
}

/// Check that the environment variable holding an API key is set.
fn check_api_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(KikkError::Config(format!(
            "{} is empty. Set it with: export {}='sk-...'",
            var, var
        ))),
        Err(_) => Err(KikkError::Config(format!(
            "{} not set. Set it with: export {}='sk-...' or add it to .env",
            var, var
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_needs_embedding_key() {
        let mut settings = Settings::default();
        settings.llm.api_key_env = "PATH".to_string();
        settings.embedding.api_key_env = "KIKK_TEST_EMBEDDING_KEY_NEVER_SET".to_string();

        let err = check(Operation::Serve, &settings).unwrap_err();
        assert!(matches!(err, KikkError::Config(ref msg) if msg.contains("KIKK_TEST_EMBEDDING_KEY_NEVER_SET")));
    }

    #[test]
    fn test_missing_key_variable_is_reported() {
        let mut settings = Settings::default();
        settings.llm.api_key_env = "KIKK_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let err = check(Operation::Ask, &settings).unwrap_err();
        assert!(err.to_string().contains("KIKK_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
