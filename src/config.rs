//! Process-wide configuration
//!
//! Read once at startup from the environment. The credential is optional: when
//! it is missing the translation gateway is built in its unavailable state and
//! stays that way for the life of the process.

use crate::mt::error::MtResult;
use crate::mt::translator::validate_language;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Older name for the credential, still honored.
pub const FALLBACK_API_KEY_VAR: &str = "API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const ENDPOINT_VAR: &str = "GEMINI_ENDPOINT";
pub const TIMEOUT_VAR: &str = "PROMPT_CRAFTER_TIMEOUT_SECS";
pub const SOURCE_LANGUAGE_VAR: &str = "PROMPT_CRAFTER_SOURCE_LANGUAGE";
pub const TARGET_LANGUAGE_VAR: &str = "PROMPT_CRAFTER_TARGET_LANGUAGE";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SOURCE_LANGUAGE: &str = "English";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Indonesian";

#[derive(Clone, PartialEq, Eq)]
pub struct CrafterConfig {
    /// `None` when no non-blank credential was found
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub source_language: String,
    pub target_language: String,
}

impl Default for CrafterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

impl CrafterConfig {
    pub fn from_env() -> MtResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    ///
    /// Blank values are treated as unset. Fails only on an unparsable timeout
    /// or an invalid language name; a missing credential is not an error.
    pub fn from_lookup<F>(lookup: F) -> MtResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();

        let timeout_secs = match get(TIMEOUT_VAR) {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                crate::mt::error::MtError::ConfigError(format!(
                    "{} must be a whole number of seconds, got '{}': {}",
                    TIMEOUT_VAR, raw, e
                ))
            })?,
            None => defaults.timeout_secs,
        };

        let config = Self {
            api_key: get(API_KEY_VAR).or_else(|| get(FALLBACK_API_KEY_VAR)),
            model: get(MODEL_VAR).unwrap_or(defaults.model),
            endpoint: get(ENDPOINT_VAR)
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or(defaults.endpoint),
            timeout_secs,
            source_language: get(SOURCE_LANGUAGE_VAR).unwrap_or(defaults.source_language),
            target_language: get(TARGET_LANGUAGE_VAR).unwrap_or(defaults.target_language),
        };

        validate_language(&config.source_language)?;
        validate_language(&config.target_language)?;

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for CrafterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrafterConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .finish()
    }
}
