//! Mock text generator for testing
//!
//! A deterministic, API-free stand-in for the Gemini provider. It counts its
//! calls and remembers the last prompt so tests can assert on exactly what the
//! gateway sent.
//!
//! # Example
//!
//! ```ignore
//! use veo_prompt_crafter::mt::{MockGenerator, MockMode, TextGenerator};
//!
//! #[tokio::test]
//! async fn test_echo() {
//!     let mock = MockGenerator::new(MockMode::Echo);
//!     assert_eq!(mock.generate("hello").await.unwrap(), "hello");
//!     assert_eq!(mock.call_count(), 1);
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::TextGenerator;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Marker after which the gateway embeds the text to translate
const TEXT_MARKER: &str = "Text to translate: ";

/// Mock response modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return the whole prompt unchanged
    Echo,

    /// Return only the text after "Text to translate: ", as a perfectly
    /// obedient translator that changes nothing would
    EchoSource,

    /// Return the source text with a `[target]` tag appended
    /// "hello" → "hello [Indonesian]"
    Tagged(String),

    /// Always return this text
    Fixed(String),

    /// Simulate a provider failure
    Error(String),
}

/// Mock generator that simulates various provider behaviors
#[derive(Debug)]
pub struct MockGenerator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockGenerator {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Create a MockGenerator with simulated network delay
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay_ms,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of `generate` calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompt passed to the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn source_part(prompt: &str) -> &str {
        prompt
            .split_once(TEXT_MARKER)
            .map(|(_, text)| text)
            .unwrap_or(prompt)
    }

    fn respond(&self, prompt: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Echo => Ok(prompt.to_string()),
            MockMode::EchoSource => Ok(Self::source_part(prompt).to_string()),
            MockMode::Tagged(tag) => Ok(format!("{} [{}]", Self::source_part(prompt), tag)),
            MockMode::Fixed(text) => Ok(text.clone()),
            MockMode::Error(msg) => Err(MtError::TranslationFailed(msg.clone())),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> MtResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_prompt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(prompt.to_string());

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        self.respond(prompt)
    }

    fn provider_name(&self) -> &str {
        "Mock Generator"
    }
}
