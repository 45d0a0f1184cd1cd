//! Effective language resolution.
//!
//! A selection carries up to four language hints of decreasing reliability.
//! The resolver keeps the hints some installed voice can speak and picks
//! one, preferring a region-qualified tag over a generic one of the same
//! language (an `en-GB` detected text beats an inherited `en` page).

use tracing::{debug, warn};

use readaloud_core::domain::normalize_language_tag;
use readaloud_core::{EffectiveLanguageSelection, FallbackMessage, FallbackMessages, Selection};

/// Clean up candidate languages against the languages installed voices speak.
///
/// Drops missing and blank candidates, normalizes the rest (mapping legacy
/// `in`/`iw`/`ji` codes), and keeps only those that prefix at least one
/// known voice language. Candidate order is preserved.
pub fn cleanup_languages<'a, I>(candidates: I, known_voice_languages: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let known: Vec<String> = known_voice_languages
        .iter()
        .filter_map(|lang| normalize_language_tag(lang))
        .collect();

    candidates
        .into_iter()
        .flatten()
        .filter_map(normalize_language_tag)
        .filter(|candidate| known.iter().any(|k| k.starts_with(candidate.as_str())))
        .collect()
}

/// Whether `candidate` is a strictly more specific tag of `primary`.
fn is_more_specific(candidate: &str, primary: &str) -> bool {
    candidate.len() > primary.len()
        && candidate.starts_with(primary)
        && candidate[primary.len()..].starts_with('-')
}

/// Resolve the single language to speak a selection in.
///
/// Candidates in priority order: detected text language, closest ancestor
/// `lang`, document `lang`, detected page language. The first surviving
/// candidate is the primary; a later, more specific tag of the same
/// language wins over it. Returns `None` when no candidate survives.
pub fn resolve_effective_language(
    selection: &Selection,
    detected_page_language: Option<&str>,
    known_voice_languages: &[String],
) -> Option<String> {
    let candidates = [
        selection.detected_text_language.as_deref(),
        selection.parent_elements_languages.first().map(String::as_str),
        selection.html_tag_language.as_deref(),
        detected_page_language,
    ];

    let cleaned = cleanup_languages(candidates, known_voice_languages);
    let primary = cleaned.first()?;

    let effective = cleaned
        .iter()
        .find(|candidate| is_more_specific(candidate, primary))
        .unwrap_or(primary);

    Some(effective.clone())
}

/// Resolves effective languages for whole batches of selections.
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    known_voice_languages: Vec<String>,
    fallback: FallbackMessages,
}

impl LanguageResolver {
    pub const fn new(known_voice_languages: Vec<String>, fallback: FallbackMessages) -> Self {
        Self {
            known_voice_languages,
            fallback,
        }
    }

    pub fn known_voice_languages(&self) -> &[String] {
        &self.known_voice_languages
    }

    /// See [`resolve_effective_language`].
    pub fn resolve_effective_language(
        &self,
        selection: &Selection,
        detected_page_language: Option<&str>,
    ) -> Option<String> {
        resolve_effective_language(selection, detected_page_language, &self.known_voice_languages)
    }

    /// Resolve every selection of a batch.
    ///
    /// Selections without text are discarded. A selection whose language
    /// cannot be resolved is replaced by the "no voice for language" message;
    /// the rest of the batch is unaffected. If nothing is left at all, the
    /// batch becomes a single "no text selected" message.
    pub fn resolve_selections(
        &self,
        selections: Vec<Selection>,
        detected_page_language: Option<&str>,
    ) -> Vec<EffectiveLanguageSelection> {
        let mut resolved: Vec<EffectiveLanguageSelection> = selections
            .into_iter()
            .filter(Selection::has_text)
            .map(|selection| {
                match self.resolve_effective_language(&selection, detected_page_language) {
                    Some(language) => {
                        debug!(%language, "Resolved effective language");
                        EffectiveLanguageSelection {
                            selection,
                            effective_language: Some(language),
                        }
                    }
                    None => {
                        warn!(
                            detected = ?selection.detected_text_language,
                            html = ?selection.html_tag_language,
                            "No installed voice matches the selection's languages"
                        );
                        fallback_selection(&self.fallback.no_voice_for_language)
                    }
                }
            })
            .collect();

        if resolved.is_empty() {
            debug!("No text in batch, using fallback message");
            resolved.push(fallback_selection(&self.fallback.no_text_selected));
        }

        resolved
    }
}

fn fallback_selection(message: &FallbackMessage) -> EffectiveLanguageSelection {
    EffectiveLanguageSelection {
        selection: Selection::new(message.text.clone())
            .with_html_tag_language(message.language.clone()),
        effective_language: Some(message.language.clone()),
    }
}
