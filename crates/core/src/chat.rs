//! Assistant chat transcript types.

use serde::{Deserialize, Serialize};

use crate::types::{Language, MessageId};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One message in the assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::random(),
            role: ChatRole::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::random(),
            role: ChatRole::Model,
            text: text.into(),
        }
    }

    /// Opening message of a fresh conversation.
    #[must_use]
    pub fn welcome(language: Language) -> Self {
        Self {
            id: MessageId::new("1"),
            role: ChatRole::Model,
            text: language.assistant_welcome().to_owned(),
        }
    }
}

/// Whether a shopper message should be sent to the assistant at all.
#[must_use]
pub fn accepts_user_input(text: &str) -> bool {
    !text.trim().is_empty()
}
