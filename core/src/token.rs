//! `Token` — One unit of the transliterated corpus.

use serde::{Deserialize, Serialize};

/// A corpus token with its optional section and gold label.
///
/// Deserializes leniently: a missing `text` becomes the empty string, which
/// is a malformed token that matches no rule.
///
/// ```
/// use folio::Token;
///
/// let token: Token = serde_json::from_str(r#"{ "token": "daiin", "section": "Herbal" }"#).unwrap();
/// assert_eq!(token.text, "daiin");
/// assert_eq!(token.section(), Some("Herbal"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token text.
    #[serde(default, alias = "token", alias = "word")]
    pub text: String,
    /// Manuscript section the token was drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Gold classification label, used by scoring.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "gold")]
    pub label: Option<String>,
}

impl Token {
    /// Create a token with no section and no label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            section: None,
            label: None,
        }
    }

    /// Set the section (builder pattern).
    #[must_use]
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Set the gold label (builder pattern).
    #[must_use]
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The section, if any.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// The gold label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns `true` if the token has no text.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.text.is_empty()
    }
}
