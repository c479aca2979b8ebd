//! Google Gemini provider
//!
//! Sends one `generateContent` request per call and returns the text of the
//! first candidate.
//!
//! # Authentication
//!
//! The provider loads the API key from the `GEMINI_API_KEY` environment
//! variable (or `API_KEY`). Obtain a key from:
//! https://aistudio.google.com/
//!
//! # Example
//!
//! ```ignore
//! use veo_prompt_crafter::mt::{GeminiProvider, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeminiProvider::from_env()?;
//!     let result = provider.generate("Translate 'good morning' to French.").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::config::CrafterConfig;
use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::TextGenerator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Gemini `generateContent` provider
#[derive(Clone)]
pub struct GeminiProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    endpoint: String,
    model: String,
}

impl GeminiProvider {
    /// Create a provider from the given configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError::GatewayUnavailable)` - If no API key is configured
    /// * `Err(MtError::ConfigError)` - If the HTTP client cannot be built
    pub fn new(config: &CrafterConfig) -> MtResult<Self> {
        let api_key = match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return Err(MtError::GatewayUnavailable(
                    "API key is not configured".to_string(),
                ));
            }
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MtError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Create a provider from environment variables
    pub fn from_env() -> MtResult<Self> {
        Self::new(&CrafterConfig::from_env()?)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The key travels in the `x-goog-api-key` header, never in the URL.
    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Pull the generated text out of a response body
    fn extract_text(body: &str) -> MtResult<String> {
        let parsed: GenerateResponse = serde_json::from_str(body).map_err(|e| {
            MtError::TranslationFailed(format!("Failed to parse API response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            return Err(MtError::TranslationFailed(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        let text: String = parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .ok_or_else(|| {
                MtError::TranslationFailed("Invalid API response: no candidates".to_string())
            })?;

        if text.trim().is_empty() {
            return Err(MtError::TranslationFailed(
                "Invalid API response: empty text".to_string(),
            ));
        }

        Ok(text)
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> MtResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(MtError::TranslationFailed(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        Self::extract_text(&text)
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}
