//! Veo prompt crafter
//!
//! Turns a structured description of a video scene into one generation
//! prompt, then has a text-generation model translate that prompt while
//! leaving the spoken dialogue exactly as written.
//!
//! # Workflow Example
//!
//! ```ignore
//! use veo_prompt_crafter::{CrafterConfig, FieldId, PromptCrafter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Configuration is read once; a missing key disables translation
//!     let crafter = PromptCrafter::from_config(&CrafterConfig::from_env()?);
//!
//!     // 2. Fill in the form
//!     crafter.with_session(|s| {
//!         s.set_field(FieldId::Subject, "a cat");
//!         s.set_field(FieldId::SpokenLine, "Hello there!");
//!     });
//!
//!     // 3. Assemble and translate
//!     let translated = crafter.craft().await?;
//!     println!("{}", crafter.snapshot().source_text);
//!     println!("{}", translated);
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod config;
pub mod crafter;
pub mod fields;
pub mod mt;
pub mod session;

// Re-export main types for convenient access
pub use assembler::{QUALITY_ENHANCER, assemble, escape_literal};
pub use config::CrafterConfig;
pub use crafter::PromptCrafter;
pub use fields::{
    FieldDefinition, FieldId, FieldValues, InputKind, SelectOption, UnknownField, definition,
    field_registry,
};
pub use mt::{MtError, MtResult, TextGenerator, TranslationGateway};
pub use session::{
    CopyTarget, Session, SessionError, SessionSnapshot, TranslationStatus,
};
