//! Google Gemini integration for generated product copy and the shopping
//! assistant.
//!
//! The client speaks the Generative Language `generateContent` endpoint and
//! returns plain text. Prompt construction and fallbacks live in
//! [`crate::services::assistant`].

mod client;
mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
