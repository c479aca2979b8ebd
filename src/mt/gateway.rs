//! Translation gateway
//!
//! Wraps the text-generation provider behind one call: `translate`. The
//! gateway builds an instruction asking the provider to translate everything
//! except spans wrapped in `{{...}}`, which must come back untouched. Those
//! spans are not parsed or restored locally; keeping them intact is up to the
//! provider following the instruction.
//!
//! A gateway built without a credential is permanently unavailable: every call
//! fails with [`MtError::GatewayUnavailable`] and nothing is sent.

use crate::config::CrafterConfig;
use crate::mt::error::{MtError, MtResult};
use crate::mt::gemini::GeminiProvider;
use crate::mt::translator::TextGenerator;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct TranslationGateway {
    backend: Backend,
    source_language: String,
    target_language: String,
}

enum Backend {
    Ready(Arc<dyn TextGenerator>),
    Unavailable(String),
}

impl TranslationGateway {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            backend: Backend::Ready(generator),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// A gateway that refuses every call with `reason`
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let defaults = CrafterConfig::default();
        Self {
            backend: Backend::Unavailable(reason.into()),
            source_language: defaults.source_language,
            target_language: defaults.target_language,
        }
    }

    /// Build the Gemini-backed gateway, or an unavailable one when the
    /// provider cannot be created
    ///
    /// Logs a warning once when translation is disabled.
    pub fn from_config(config: &CrafterConfig) -> Self {
        match GeminiProvider::new(config) {
            Ok(provider) => {
                info!(
                    model = provider.model(),
                    source = %config.source_language,
                    target = %config.target_language,
                    "Translation gateway ready"
                );
                Self::new(
                    Arc::new(provider),
                    config.source_language.clone(),
                    config.target_language.clone(),
                )
            }
            Err(e) => {
                warn!("{}. Translation functionality will be disabled.", e);
                let reason = match e {
                    MtError::GatewayUnavailable(msg)
                    | MtError::ConfigError(msg)
                    | MtError::TranslationFailed(msg) => msg,
                };
                Self {
                    backend: Backend::Unavailable(reason),
                    source_language: config.source_language.clone(),
                    target_language: config.target_language.clone(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            Backend::Ready(_) => None,
            Backend::Unavailable(reason) => Some(reason),
        }
    }

    pub fn provider_name(&self) -> Option<&str> {
        match &self.backend {
            Backend::Ready(generator) => Some(generator.provider_name()),
            Backend::Unavailable(_) => None,
        }
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// The full instruction sent to the provider for `text`
    pub fn translation_instruction(&self, text: &str) -> String {
        format!(
            "Translate the following {source} text to {target}. IMPORTANT: If you find a part of the text enclosed in double curly braces like {{{{this part}}}}, keep that specific part exactly as it is, including the braces, in its original position, without translating it. Only translate the text outside of the curly braces. Reply with the translation only. Text to translate: {text}",
            source = self.source_language,
            target = self.target_language,
            text = text,
        )
    }

    /// Translate `source_text`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Provider output verbatim, or `""` for blank input
    ///   (no request is made in that case)
    /// * `Err(MtError::GatewayUnavailable)` - No credential configured
    /// * `Err(MtError::TranslationFailed)` - The provider call failed
    pub async fn translate(&self, source_text: &str) -> MtResult<String> {
        let generator = match &self.backend {
            Backend::Ready(generator) => generator,
            Backend::Unavailable(reason) => {
                return Err(MtError::GatewayUnavailable(reason.clone()));
            }
        };

        if source_text.trim().is_empty() {
            debug!("Blank source text, skipping translation");
            return Ok(String::new());
        }

        let instruction = self.translation_instruction(source_text);
        info!(
            provider = generator.provider_name(),
            chars = source_text.chars().count(),
            "Requesting translation"
        );

        match generator.generate(&instruction).await {
            Ok(text) => {
                debug!(chars = text.chars().count(), "Translation received");
                Ok(text)
            }
            Err(e) => {
                error!("Translation API error: {}", e);
                // Any provider-side failure is transient from the caller's view.
                Err(match e {
                    MtError::TranslationFailed(msg) => MtError::TranslationFailed(msg),
                    other => MtError::TranslationFailed(other.to_string()),
                })
            }
        }
    }
}

impl std::fmt::Debug for TranslationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationGateway")
            .field("provider", &self.provider_name())
            .field("unavailable_reason", &self.unavailable_reason())
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .finish()
    }
}
