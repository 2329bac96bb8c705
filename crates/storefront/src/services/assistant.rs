//! Generated copy and the shopping assistant.
//!
//! [`Copywriter`] is the generative-text seam. [`Assistant`] wraps an optional
//! copywriter and owns the fallbacks, so callers never see a generator failure
//! except where the shopper explicitly asked for generated text.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use shopyz_core::{ChatMessage, ChatRole, Language, Product};

use crate::gemini::types::{Content, Role};
use crate::gemini::{GeminiClient, GeminiError};

/// Category used in prompts when the admin form leaves it blank.
pub const DEFAULT_DESCRIPTION_CATEGORY: &str = "Product";

/// Generative text collaborator.
#[async_trait]
pub trait Copywriter: Send + Sync {
    /// A short sales pitch for a product.
    async fn generate_pitch(
        &self,
        product: &Product,
        language: Language,
    ) -> Result<String, GeminiError>;

    /// A catalog description for a product that is being created.
    async fn generate_description(
        &self,
        name: &str,
        category: &str,
        language: Language,
    ) -> Result<String, GeminiError>;

    /// The assistant's next chat message given the conversation so far.
    async fn chat_reply(
        &self,
        history: &[ChatMessage],
        catalog: &[Product],
        language: Language,
    ) -> Result<String, GeminiError>;
}

#[async_trait]
impl Copywriter for GeminiClient {
    async fn generate_pitch(
        &self,
        product: &Product,
        language: Language,
    ) -> Result<String, GeminiError> {
        let prompt = pitch_prompt(product, language);
        self.generate(None, vec![Content::text(Role::User, prompt)])
            .await
    }

    async fn generate_description(
        &self,
        name: &str,
        category: &str,
        language: Language,
    ) -> Result<String, GeminiError> {
        let prompt = description_prompt(name, category, language);
        self.generate(None, vec![Content::text(Role::User, prompt)])
            .await
    }

    async fn chat_reply(
        &self,
        history: &[ChatMessage],
        catalog: &[Product],
        language: Language,
    ) -> Result<String, GeminiError> {
        let contents = conversation_contents(history);
        if contents.is_empty() {
            return Err(GeminiError::Empty(Some("no shopper message".to_string())));
        }
        self.generate(Some(chat_instruction(catalog, language)), contents)
            .await
    }
}

// =============================================================================
// Prompts
// =============================================================================

fn pitch_prompt(product: &Product, language: Language) -> String {
    format!(
        "Write a persuasive two-sentence sales pitch in {lang} for this product.\n\
         Name: {name}\n\
         Category: {category}\n\
         Price: {price}\n\
         Description: {description}\n\
         Reply with the pitch only.",
        lang = language.prompt_name(),
        name = product.name,
        category = product.category,
        price = product.price.display(),
        description = product.description,
    )
}

fn description_prompt(name: &str, category: &str, language: Language) -> String {
    format!(
        "Write an engaging online store description in {lang} of about 60 words.\n\
         Product name: {name}\n\
         Category: {category}\n\
         Reply with the description only.",
        lang = language.prompt_name(),
    )
}

fn chat_instruction(catalog: &[Product], language: Language) -> String {
    let mut instruction = format!(
        "You are the shopyZ shopping assistant for customers in Algeria. \
         Answer in {lang}, briefly and warmly. Prices are in DZD. \
         Delivery reaches all 58 wilayas, either to a Stop Desk or to the home. \
         Only recommend products from this catalog:\n",
        lang = language.prompt_name(),
    );
    for product in catalog {
        let _ = writeln!(
            instruction,
            "- {} ({}), {}: {}",
            product.name,
            product.category,
            product.price.display(),
            product.description
        );
    }
    instruction
}

/// Map a transcript to generator turns.
///
/// Leading model turns (the welcome message) are dropped because the
/// conversation must open with a user turn.
fn conversation_contents(history: &[ChatMessage]) -> Vec<Content> {
    history
        .iter()
        .skip_while(|m| m.role == ChatRole::Model)
        .map(|m| {
            let role = match m.role {
                ChatRole::User => Role::User,
                ChatRole::Model => Role::Model,
            };
            Content::text(role, m.text.clone())
        })
        .collect()
}

// =============================================================================
// Assistant
// =============================================================================

/// Errors from explicitly requested generation.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Please enter a product name first.")]
    MissingName,

    #[error("text generation is not configured")]
    Disabled,

    #[error(transparent)]
    Gemini(#[from] GeminiError),
}

/// Generated-text front door with fallbacks.
#[derive(Clone, Default)]
pub struct Assistant {
    copywriter: Option<Arc<dyn Copywriter>>,
}

impl Assistant {
    #[must_use]
    pub fn new(copywriter: Option<Arc<dyn Copywriter>>) -> Self {
        Self { copywriter }
    }

    /// Whether a generator is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.copywriter.is_some()
    }

    /// Pitch for the product page, or the product description if generation
    /// is unavailable or fails.
    pub async fn pitch(&self, product: &Product, language: Language) -> String {
        let Some(copywriter) = &self.copywriter else {
            return product.description.clone();
        };

        match copywriter.generate_pitch(product, language).await {
            Ok(pitch) => pitch,
            Err(e) => {
                warn!(error = %e, product_id = %product.id, "Pitch generation failed");
                product.description.clone()
            }
        }
    }

    /// Description for the admin form.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::MissingName`] for a blank name,
    /// [`AssistantError::Disabled`] with no generator, or the generator error.
    pub async fn describe(
        &self,
        name: &str,
        category: Option<&str>,
        language: Language,
    ) -> Result<String, AssistantError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AssistantError::MissingName);
        }
        let copywriter = self.copywriter.as_ref().ok_or(AssistantError::Disabled)?;
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION_CATEGORY);

        Ok(copywriter
            .generate_description(name, category, language)
            .await?)
    }

    /// The assistant's reply to `history`.
    ///
    /// Always yields a model message; failures produce the localized apology.
    pub async fn reply(
        &self,
        history: &[ChatMessage],
        catalog: &[Product],
        language: Language,
    ) -> ChatMessage {
        let Some(copywriter) = &self.copywriter else {
            return ChatMessage::model(language.assistant_unavailable());
        };

        match copywriter.chat_reply(history, catalog, language).await {
            Ok(text) => ChatMessage::model(text),
            Err(e) => {
                warn!(error = %e, "Chat reply failed");
                ChatMessage::model(language.assistant_unavailable())
            }
        }
    }
}
