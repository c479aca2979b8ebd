/// Translation Module
///
/// Sends an assembled prompt to a text-generation provider and asks for it to
/// be translated, leaving every `{{...}}` span exactly as written.
///
/// # Overview
///
/// 1. **Provider trait** - `TextGenerator`, one instruction in, free text out
/// 2. **Gemini provider** - the production backend over HTTPS
/// 3. **Mock provider** - deterministic stand-in with call counting for tests
/// 4. **Gateway** - builds the translation instruction, short-circuits blank
///    input, and reports a missing credential as permanently unavailable
///
/// # Example
///
/// ```ignore
/// use veo_prompt_crafter::config::CrafterConfig;
/// use veo_prompt_crafter::mt::TranslationGateway;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = CrafterConfig::from_env()?;
///     let gateway = TranslationGateway::from_config(&config);
///
///     let translated = gateway
///         .translate("A cat says: {{Hello there!}}.")
///         .await?;
///
///     println!("{}", translated);
///     Ok(())
/// }
/// ```
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod mock;
pub mod translator;


pub use error::{MtError, MtResult};
pub use gateway::TranslationGateway;
pub use gemini::GeminiProvider;
pub use mock::{MockGenerator, MockMode};
pub use translator::{TextGenerator, validate_language};
