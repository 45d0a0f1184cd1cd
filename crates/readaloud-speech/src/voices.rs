//! Voice resolution against the live voice list.
//!
//! Engines label voice languages inconsistently, so every language
//! comparison here is done on normalized tags. When several voices match,
//! the first one in engine list order wins.

use std::collections::BTreeMap;

use readaloud_core::domain::{language_group, normalize_language_tag};
use readaloud_core::{Voice, VoiceReference, VoiceTarget};

use crate::error::SpeechError;

/// Find a voice by exact name. Duplicate names resolve to the first listed.
pub fn resolve_by_name<'a>(voices: &'a [Voice], name: &str) -> Option<&'a Voice> {
    voices.iter().find(|voice| voice.name == name)
}

/// Find a voice for a language.
///
/// Voices whose language equals `language` come first, followed by voices
/// whose language starts with its language group (`en` for `en-US`); the
/// first candidate wins.
pub fn resolve_by_language<'a>(voices: &'a [Voice], language: &str) -> Option<&'a Voice> {
    let wanted = normalize_language_tag(language)?;
    let group = language_group(&wanted)?;

    let exact = voices
        .iter()
        .filter(|voice| voice.normalized_language().as_deref() == Some(wanted.as_str()));
    let same_group = voices.iter().filter(|voice| {
        voice
            .normalized_language()
            .is_some_and(|lang| lang.starts_with(group.as_str()))
    });

    exact.chain(same_group).next()
}

/// Resolve a [`VoiceReference`] to an installed voice.
///
/// A name reference only ever resolves by name.
pub fn resolve<'a>(voices: &'a [Voice], reference: &VoiceReference) -> Result<&'a Voice, SpeechError> {
    let found = match &reference.target {
        VoiceTarget::Name(name) => resolve_by_name(voices, name),
        VoiceTarget::Language(language) => resolve_by_language(voices, language),
    };

    found.ok_or_else(|| SpeechError::VoiceNotFound {
        reference: reference.clone(),
    })
}

/// Distinct normalized voice languages, in list order.
pub fn known_voice_languages(voices: &[Voice]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for language in voices.iter().filter_map(Voice::normalized_language) {
        if !languages.contains(&language) {
            languages.push(language);
        }
    }
    languages
}

/// Voices keyed by normalized language, list order kept within each entry.
pub fn voices_by_language(voices: &[Voice]) -> BTreeMap<String, Vec<&Voice>> {
    let mut grouped: BTreeMap<String, Vec<&Voice>> = BTreeMap::new();
    for voice in voices {
        if let Some(language) = voice.normalized_language() {
            grouped.entry(language).or_default().push(voice);
        }
    }
    grouped
}

/// Known languages keyed by language group.
pub fn languages_by_group(voices: &[Voice]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for language in known_voice_languages(voices) {
        if let Some(group) = language_group(&language) {
            grouped.entry(group).or_default().push(language);
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<Voice> {
        vec![
            Voice::new("Samantha", "en-US").as_default(),
            Voice::new("Daniel", "en_GB"),
            Voice::new("Thomas", "fr-FR"),
            Voice::new("Daniel", "de-DE"),
            Voice::new("Carmit", "iw-IL"),
            Voice::new("Unlabeled", ""),
        ]
    }

    #[test]
    fn test_resolve_by_name_first_duplicate_wins() {
        let voices = voices();
        let voice = resolve_by_name(&voices, "Daniel").unwrap();
        assert_eq!(voice.lang, "en_GB");
        assert!(resolve_by_name(&voices, "daniel").is_none());
    }

    #[test]
    fn test_resolve_by_language_exact_before_group() {
        let voices = voices();
        assert_eq!(resolve_by_language(&voices, "en-GB").unwrap().name, "Daniel");
        assert_eq!(resolve_by_language(&voices, "en-gb").unwrap().name, "Daniel");
        assert_eq!(resolve_by_language(&voices, "en-AU").unwrap().name, "Samantha");
        assert_eq!(resolve_by_language(&voices, "en").unwrap().name, "Samantha");
    }

    #[test]
    fn test_resolve_by_language_normalizes_engine_labels() {
        let voices = voices();
        assert_eq!(resolve_by_language(&voices, "he").unwrap().name, "Carmit");
        assert_eq!(resolve_by_language(&voices, "iw").unwrap().name, "Carmit");
        assert!(resolve_by_language(&voices, "sv").is_none());
        assert!(resolve_by_language(&voices, "").is_none());
    }

    #[test]
    fn test_name_reference_never_uses_language_path() {
        let voices = vec![Voice::new("en", "en-US"), Voice::new("Alex", "en-US")];
        let reference = VoiceReference::by_name("X");
        assert!(matches!(
            resolve(&voices, &reference),
            Err(SpeechError::VoiceNotFound { .. })
        ));

        let reference = VoiceReference::by_name("Alex");
        assert_eq!(resolve(&voices, &reference).unwrap().name, "Alex");
    }

    #[test]
    fn test_language_reference_resolves() {
        let voices = voices();
        let reference = VoiceReference::by_language("fr-CA");
        assert_eq!(resolve(&voices, &reference).unwrap().name, "Thomas");
    }

    #[test]
    fn test_known_voice_languages_are_distinct_and_normalized() {
        let mut voices = voices();
        voices.push(Voice::new("Alex", "en-US"));
        assert_eq!(
            known_voice_languages(&voices),
            vec!["en-US", "en-GB", "fr-FR", "de-DE", "he-IL"]
        );
    }

    #[test]
    fn test_grouping_helpers() {
        let voices = voices();
        let by_language = voices_by_language(&voices);
        assert_eq!(by_language["en-GB"][0].name, "Daniel");
        assert!(!by_language.contains_key(""));

        let by_group = languages_by_group(&voices);
        assert_eq!(by_group["en"], vec!["en-US", "en-GB"]);
        assert_eq!(by_group["he"], vec!["he-IL"]);
    }
}
