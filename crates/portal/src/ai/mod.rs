//! Gemini integration for report enhancement and analysis.
//!
//! - [`client`] - REST client for `generateContent`
//! - [`prompts`] - Prompt templates and their sampling settings
//! - [`format`] - Line classification of generated text for display

pub mod client;
pub mod error;
pub mod format;
pub mod prompts;
pub mod types;

pub use client::GeminiClient;
pub use error::AiError;
pub use format::{ReportLine, format_report};
pub use prompts::Prompt;
pub use types::{Attachment, GenerationSettings, ModelTier};
