//! Session state
//!
//! Everything one interactive session knows: the field values, the last
//! assembled prompt (which the user may have edited), the last translation and
//! its status, and the short-lived "copied" confirmations.
//!
//! Translation is split into a synchronous `begin_*` step, which checks the
//! in-flight guard and marks the session busy, and a synchronous `complete`
//! step that applies the outcome. The asynchronous provider call happens in
//! between, outside any lock (see [`crate::crafter::PromptCrafter`]).

use crate::assembler::assemble;
use crate::fields::{FieldId, FieldValues};
use crate::mt::error::{MtError, MtResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How long a "copied" confirmation stays visible.
pub const COPY_CONFIRMATION: Duration = Duration::from_secs(2);

pub const UNAVAILABLE_MESSAGE: &str = "Translation service unavailable (API key not configured).";
pub const FAILED_MESSAGE: &str = "Failed to translate the prompt. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationStatus {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Which text a copy confirmation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CopyTarget {
    Source,
    Translation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A translation is already in flight
    Busy,
    Translation(MtError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Busy => write!(f, "A translation is already in progress"),
            SessionError::Translation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Busy => None,
            SessionError::Translation(e) => Some(e),
        }
    }
}

impl From<MtError> for SessionError {
    fn from(err: MtError) -> Self {
        SessionError::Translation(err)
    }
}

/// Ticket for a translation the session has agreed to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTranslation {
    source_text: String,
}

impl PendingTranslation {
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

/// Serializable view of a session at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub values: FieldValues,
    pub source_text: String,
    pub translated_text: String,
    pub status: TranslationStatus,
    pub error: Option<String>,
    pub gateway_available: bool,
    pub source_copied: bool,
    pub translation_copied: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    values: FieldValues,
    source_text: String,
    translated_text: String,
    status: TranslationStatus,
    error: Option<String>,
    gateway_available: bool,
    source_copied_at: Option<Instant>,
    translation_copied_at: Option<Instant>,
}

impl Session {
    /// A fresh session. When the gateway is unavailable the static
    /// explanation is shown from the start.
    pub fn new(gateway_available: bool) -> Self {
        Self {
            values: FieldValues::default(),
            source_text: String::new(),
            translated_text: String::new(),
            status: TranslationStatus::Idle,
            error: (!gateway_available).then(|| UNAVAILABLE_MESSAGE.to_string()),
            gateway_available,
            source_copied_at: None,
            translation_copied_at: None,
        }
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn set_field(&mut self, id: FieldId, value: impl Into<String>) {
        self.values.set(id, value);
    }

    pub fn set_values(&mut self, values: FieldValues) {
        self.values = values;
    }

    /// The assembled prompt as currently displayed, edits included.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Replace the assembled prompt with a hand-edited version.
    pub fn edit_source(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn status(&self) -> TranslationStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn gateway_available(&self) -> bool {
        self.gateway_available
    }

    pub fn is_busy(&self) -> bool {
        self.status == TranslationStatus::InFlight
    }

    /// Whether the craft/retranslate triggers should be enabled.
    pub fn can_translate(&self) -> bool {
        self.gateway_available && !self.is_busy()
    }

    /// Assemble the current values and, if possible, start translating them.
    ///
    /// The assembled prompt is stored even when translation is unavailable.
    pub fn begin_craft(&mut self) -> Result<PendingTranslation, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }

        self.source_text = assemble(&self.values);
        self.source_copied_at = None;
        self.translation_copied_at = None;

        self.begin(self.source_text.clone())
    }

    /// Start translating the current, possibly hand-edited, prompt.
    pub fn begin_retranslate(&mut self) -> Result<PendingTranslation, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }

        self.begin(self.source_text.clone())
    }

    fn begin(&mut self, source_text: String) -> Result<PendingTranslation, SessionError> {
        self.translated_text.clear();

        if !self.gateway_available {
            self.status = TranslationStatus::Idle;
            self.error = Some(UNAVAILABLE_MESSAGE.to_string());
            return Err(SessionError::Translation(MtError::GatewayUnavailable(
                UNAVAILABLE_MESSAGE.to_string(),
            )));
        }

        self.status = TranslationStatus::InFlight;
        self.error = None;
        Ok(PendingTranslation { source_text })
    }

    /// Apply the outcome of a translation.
    ///
    /// Completions are applied in arrival order, so if two translations ever
    /// overlap the last one to finish wins.
    pub fn complete(&mut self, result: &MtResult<String>) {
        match result {
            Ok(text) => {
                self.translated_text = text.clone();
                self.error = None;
                self.status = if text.is_empty() {
                    TranslationStatus::Idle
                } else {
                    TranslationStatus::Succeeded
                };
            }
            Err(e) if e.is_permanent() => {
                self.translated_text.clear();
                self.gateway_available = false;
                self.error = Some(UNAVAILABLE_MESSAGE.to_string());
                self.status = TranslationStatus::Idle;
            }
            Err(_) => {
                self.translated_text.clear();
                self.error = Some(FAILED_MESSAGE.to_string());
                self.status = TranslationStatus::Failed;
            }
        }
    }

    fn copy_slot(&mut self, target: CopyTarget) -> &mut Option<Instant> {
        match target {
            CopyTarget::Source => &mut self.source_copied_at,
            CopyTarget::Translation => &mut self.translation_copied_at,
        }
    }

    /// Record that `target` was copied at `now`.
    ///
    /// Returns false, recording nothing, when there is no text to copy or the
    /// translation is still in flight.
    pub fn mark_copied_at(&mut self, target: CopyTarget, now: Instant) -> bool {
        let copyable = match target {
            CopyTarget::Source => !self.source_text.is_empty(),
            CopyTarget::Translation => !self.translated_text.is_empty() && !self.is_busy(),
        };
        if copyable {
            *self.copy_slot(target) = Some(now);
        }
        copyable
    }

    pub fn mark_copied(&mut self, target: CopyTarget) -> bool {
        self.mark_copied_at(target, Instant::now())
    }

    /// Whether the copy confirmation for `target` is still showing at `now`.
    pub fn is_copied_at(&self, target: CopyTarget, now: Instant) -> bool {
        let copied_at = match target {
            CopyTarget::Source => self.source_copied_at,
            CopyTarget::Translation => self.translation_copied_at,
        };
        copied_at.is_some_and(|at| now.saturating_duration_since(at) < COPY_CONFIRMATION)
    }

    pub fn is_copied(&self, target: CopyTarget) -> bool {
        self.is_copied_at(target, Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            values: self.values.clone(),
            source_text: self.source_text.clone(),
            translated_text: self.translated_text.clone(),
            status: self.status,
            error: self.error.clone(),
            gateway_available: self.gateway_available,
            source_copied: self.is_copied_at(CopyTarget::Source, now),
            translation_copied: self.is_copied_at(CopyTarget::Translation, now),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_at(Instant::now())
    }
}
