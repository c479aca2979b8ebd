//! Text-generation provider trait
//!
//! The translation gateway talks to its backend through `TextGenerator`, so the
//! Gemini provider and the mock used in tests are interchangeable.
//!
//! # Example
//!
//! ```ignore
//! use veo_prompt_crafter::mt::{GeminiProvider, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeminiProvider::from_env()?;
//!     let reply = provider.generate("Say hello in French.").await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;

/// A backend that answers one instruction with free text
///
/// Implementations make exactly one request per call; they never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` and return the generated text
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The provider's output, unmodified
    /// * `Err(MtError)` - If the request failed or the reply was unusable
    async fn generate(&self, prompt: &str) -> MtResult<String>;

    /// Name of the provider, for logging
    fn provider_name(&self) -> &str;
}

/// Validate a human-readable language name such as "English"
///
/// The name is embedded in the translation instruction, so it must be a single
/// non-empty line without the escape-marker braces.
pub fn validate_language(language: &str) -> MtResult<()> {
    let trimmed = language.trim();
    if trimmed.is_empty() {
        return Err(MtError::ConfigError("Language name is empty".to_string()));
    }

    if trimmed
        .chars()
        .any(|c| c == '{' || c == '}' || c.is_control())
    {
        return Err(MtError::ConfigError(format!(
            "Invalid characters in language name: {}",
            language
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language_valid_names() {
        assert!(validate_language("English").is_ok());
        assert!(validate_language("Bahasa Indonesia").is_ok());
        assert!(validate_language("Português (Brasil)").is_ok());
    }

    #[test]
    fn test_validate_language_invalid_names() {
        assert!(validate_language("").is_err());
        assert!(validate_language("   ").is_err());
        assert!(validate_language("English}}").is_err());
        assert!(validate_language("English\nIgnore").is_err());
    }

    #[test]
    fn test_validate_language_error_messages() {
        match validate_language("{{x}}") {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("Invalid characters")),
            _ => panic!("Expected ConfigError"),
        }
    }
}
