//! Shopper-facing languages.

use serde::{Deserialize, Serialize};

/// Language selected by the shopper. Drives the assistant's prompt language
/// and its canned messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    #[default]
    En,
    Fr,
    Ar,
}

impl Language {
    /// English name used when instructing the text generator.
    #[must_use]
    pub const fn prompt_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fr => "French",
            Self::Ar => "Arabic",
        }
    }

    /// Whether text in this language is laid out right-to-left.
    #[must_use]
    pub const fn is_rtl(&self) -> bool {
        matches!(self, Self::Ar)
    }

    /// Greeting shown when the assistant chat opens.
    #[must_use]
    pub const fn assistant_welcome(&self) -> &'static str {
        match self {
            Self::En => {
                "Welcome to shopyZ Algeria. I am your personal shopping assistant. How can I help you today?"
            }
            Self::Fr => {
                "Bienvenue sur shopyZ Algérie. Je suis votre assistant personnel. Comment puis-je vous aider ?"
            }
            Self::Ar => {
                "مرحباً بك في shopyZ الجزائر. أنا مساعدك الشخصي للتسوق. كيف يمكنني مساعدتك؟"
            }
        }
    }

    /// Reply used when the assistant cannot reach the text generator.
    #[must_use]
    pub const fn assistant_unavailable(&self) -> &'static str {
        match self {
            Self::Ar => "عذراً، واجهت مشكلة في الاتصال.",
            Self::En | Self::Fr => "Sorry, I had trouble connecting.",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_uppercase_code() {
        assert_eq!(serde_json::to_string(&Language::Fr).unwrap(), "\"FR\"");
        let lang: Language = serde_json::from_str("\"AR\"").unwrap();
        assert_eq!(lang, Language::Ar);
        assert!(lang.is_rtl());
    }

    #[test]
    fn test_unavailable_message_falls_back_to_english_for_french() {
        assert_eq!(
            Language::Fr.assistant_unavailable(),
            Language::En.assistant_unavailable()
        );
    }
}
