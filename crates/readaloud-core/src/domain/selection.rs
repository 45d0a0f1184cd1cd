//! Text selections submitted for speech.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a browser tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unit of text plus the language hints gathered where it was selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Selected text.
    pub text: String,

    /// `lang` attribute of the document's root element.
    #[serde(default)]
    pub html_tag_language: Option<String>,

    /// `lang` attributes of the selection's ancestors, closest first.
    #[serde(default)]
    pub parent_elements_languages: Vec<String>,

    /// Language detected from the text itself.
    #[serde(default)]
    pub detected_text_language: Option<String>,
}

impl Selection {
    /// A selection with no language hints.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_html_tag_language(mut self, language: impl Into<String>) -> Self {
        self.html_tag_language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_parent_language(mut self, language: impl Into<String>) -> Self {
        self.parent_elements_languages.push(language.into());
        self
    }

    #[must_use]
    pub fn with_detected_text_language(mut self, language: impl Into<String>) -> Self {
        self.detected_text_language = Some(language.into());
        self
    }

    /// Whether the selection has speakable text.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// A [`Selection`] with the language chosen to drive voice selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveLanguageSelection {
    #[serde(flatten)]
    pub selection: Selection,

    /// `None` when no hint matched an installed voice.
    pub effective_language: Option<String>,
}

impl EffectiveLanguageSelection {
    /// Text to speak.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.selection.text
    }
}
