//! Session controller
//!
//! `PromptCrafter` owns one [`Session`] and one [`TranslationGateway`] and
//! runs the "assemble → translate → publish" sequence. The session lock is
//! only held for the synchronous steps on either side of the provider call.

use crate::config::CrafterConfig;
use crate::fields::FieldValues;
use crate::mt::gateway::TranslationGateway;
use crate::session::{PendingTranslation, Session, SessionError, SessionSnapshot};
use std::sync::Mutex;
use tracing::{info, warn};

pub struct PromptCrafter {
    session: Mutex<Session>,
    gateway: TranslationGateway,
}

impl PromptCrafter {
    pub fn new(gateway: TranslationGateway) -> Self {
        Self {
            session: Mutex::new(Session::new(gateway.is_available())),
            gateway,
        }
    }

    pub fn from_config(config: &CrafterConfig) -> Self {
        Self::new(TranslationGateway::from_config(config))
    }

    pub fn gateway(&self) -> &TranslationGateway {
        &self.gateway
    }

    /// Run `f` against the session under its lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut session)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.with_session(|s| s.snapshot())
    }

    /// Assemble the current values and translate the result.
    ///
    /// Returns the translated text. The assembled prompt is stored in the
    /// session even when translation is refused.
    pub async fn craft(&self) -> Result<String, SessionError> {
        let pending = self.with_session(|s| s.begin_craft());
        let pending = self.log_refusal("craft", pending)?;
        self.run(pending).await
    }

    /// Replace the field values and craft from them under one lock, so no
    /// other update can land in between.
    ///
    /// A refused craft (busy) leaves the stored values untouched.
    pub async fn craft_with(&self, values: FieldValues) -> Result<String, SessionError> {
        let pending = self.with_session(|s| {
            if s.is_busy() {
                return Err(SessionError::Busy);
            }
            s.set_values(values);
            s.begin_craft()
        });
        let pending = self.log_refusal("craft", pending)?;
        self.run(pending).await
    }

    /// Translate the current prompt again, without reassembling it.
    pub async fn retranslate(&self) -> Result<String, SessionError> {
        let pending = self.with_session(|s| s.begin_retranslate());
        let pending = self.log_refusal("retranslate", pending)?;
        self.run(pending).await
    }

    /// Store `text` as the displayed prompt and translate it under one lock.
    pub async fn retranslate_text(&self, text: String) -> Result<String, SessionError> {
        let pending = self.with_session(|s| {
            if s.is_busy() {
                return Err(SessionError::Busy);
            }
            s.edit_source(text);
            s.begin_retranslate()
        });
        let pending = self.log_refusal("retranslate", pending)?;
        self.run(pending).await
    }

    fn log_refusal(
        &self,
        trigger: &str,
        pending: Result<PendingTranslation, SessionError>,
    ) -> Result<PendingTranslation, SessionError> {
        if let Err(e) = &pending {
            warn!(trigger, "Translation not started: {}", e);
        }
        pending
    }

    async fn run(&self, pending: PendingTranslation) -> Result<String, SessionError> {
        let result = self.gateway.translate(pending.source_text()).await;
        self.with_session(|s| s.complete(&result));
        if result.is_ok() {
            info!("Translation published");
        }
        result.map_err(SessionError::from)
    }
}

impl std::fmt::Debug for PromptCrafter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptCrafter")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldId;
    use crate::mt::error::MtError;
    use crate::mt::mock::{MockGenerator, MockMode};
    use crate::session::{FAILED_MESSAGE, TranslationStatus, UNAVAILABLE_MESSAGE};
    use std::sync::Arc;

    fn crafter_with(mode: MockMode) -> (PromptCrafter, Arc<MockGenerator>) {
        let mock = Arc::new(MockGenerator::new(mode));
        let gateway = TranslationGateway::new(mock.clone(), "English", "Indonesian");
        (PromptCrafter::new(gateway), mock)
    }

    #[tokio::test]
    async fn test_craft_assembles_then_translates() {
        let (crafter, mock) = crafter_with(MockMode::Tagged("Indonesian".to_string()));
        crafter.with_session(|s| {
            s.set_field(FieldId::Subject, "a cat");
            s.set_field(FieldId::Action, "sleeping");
        });

        let translated = crafter.craft().await.unwrap();
        let snapshot = crafter.snapshot();

        assert!(snapshot.source_text.starts_with("Visualize a scene featuring a cat sleeping."));
        assert_eq!(translated, format!("{} [Indonesian]", snapshot.source_text));
        assert_eq!(snapshot.translated_text, translated);
        assert_eq!(snapshot.status, TranslationStatus::Succeeded);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_craft_without_configuration_never_calls_provider() {
        let crafter = PromptCrafter::from_config(&CrafterConfig::default());
        crafter.with_session(|s| s.set_field(FieldId::Subject, "a cat"));

        match crafter.craft().await {
            Err(SessionError::Translation(MtError::GatewayUnavailable(_))) => {}
            other => panic!("Expected GatewayUnavailable, got {:?}", other),
        }

        let snapshot = crafter.snapshot();
        assert!(!snapshot.gateway_available);
        assert_eq!(snapshot.error.as_deref(), Some(UNAVAILABLE_MESSAGE));
        assert!(snapshot.source_text.contains("a cat"));
    }

    #[tokio::test]
    async fn test_retranslate_sends_edited_text() {
        let (crafter, mock) = crafter_with(MockMode::EchoSource);
        crafter.craft().await.unwrap();

        crafter.with_session(|s| s.edit_source("Edited: {{Tetap sama}}."));
        let translated = crafter.retranslate().await.unwrap();

        assert_eq!(translated, "Edited: {{Tetap sama}}.");
        assert!(mock.last_prompt().unwrap().ends_with("Text to translate: Edited: {{Tetap sama}}."));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_surfaces_message_and_allows_retry() {
        let (crafter, mock) = crafter_with(MockMode::Error("HTTP 500".to_string()));
        let result = crafter.craft().await;
        assert!(matches!(
            result,
            Err(SessionError::Translation(MtError::TranslationFailed(_)))
        ));

        let snapshot = crafter.snapshot();
        assert_eq!(snapshot.status, TranslationStatus::Failed);
        assert_eq!(snapshot.error.as_deref(), Some(FAILED_MESSAGE));
        assert_eq!(snapshot.translated_text, "");

        // Retry goes out again
        assert!(crafter.retranslate().await.is_err());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_overlapping_trigger_is_refused() {
        let mock = Arc::new(MockGenerator::with_delay(MockMode::EchoSource, 100));
        let crafter = PromptCrafter::new(TranslationGateway::new(
            mock.clone(),
            "English",
            "Indonesian",
        ));

        let (first, second) = tokio::join!(crafter.craft(), async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            crafter.retranslate().await
        });

        assert!(first.is_ok());
        assert_eq!(second, Err(SessionError::Busy));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(crafter.snapshot().status, TranslationStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_craft_with_uses_supplied_values() {
        let (crafter, mock) = crafter_with(MockMode::EchoSource);
        crafter.with_session(|s| s.set_field(FieldId::Subject, "a dog"));

        let values = FieldValues::new().with(FieldId::Subject, "a cat");
        let translated = crafter.craft_with(values).await.unwrap();

        assert!(translated.starts_with("Visualize a scene featuring a cat."));
        assert_eq!(crafter.snapshot().values.subject, "a cat");
        assert!(mock.last_prompt().unwrap().contains("a cat"));
    }

    #[tokio::test]
    async fn test_retranslate_text_sends_supplied_text() {
        let (crafter, mock) = crafter_with(MockMode::EchoSource);
        crafter.with_session(|s| s.edit_source("stale text"));

        let translated = crafter
            .retranslate_text("Fresh edit {{Halo!}}".to_string())
            .await
            .unwrap();

        assert_eq!(translated, "Fresh edit {{Halo!}}");
        assert_eq!(crafter.snapshot().source_text, "Fresh edit {{Halo!}}");
        assert!(!mock.last_prompt().unwrap().contains("stale"));
    }

    #[tokio::test]
    async fn test_busy_refusal_keeps_stored_input() {
        let mock = Arc::new(MockGenerator::with_delay(MockMode::EchoSource, 100));
        let crafter = PromptCrafter::new(TranslationGateway::new(mock, "English", "Indonesian"));
        crafter.with_session(|s| s.edit_source("original"));

        let (first, second) = tokio::join!(crafter.retranslate(), async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            crafter.retranslate_text("late edit".to_string()).await
        });

        assert!(first.is_ok());
        assert_eq!(second, Err(SessionError::Busy));
        assert_eq!(crafter.snapshot().source_text, "original");
    }

    #[tokio::test]
    async fn test_retranslate_blank_source_skips_provider() {
        let (crafter, mock) = crafter_with(MockMode::Echo);
        let translated = crafter.retranslate().await.unwrap();
        assert_eq!(translated, "");
        assert_eq!(mock.call_count(), 0);
        assert_eq!(crafter.snapshot().status, TranslationStatus::Idle);
    }
}
