//! Language tag helpers.
//!
//! Speech engines frequently report voice languages that are not valid
//! BCP-47 (`en_US`, `EN-us`, legacy `iw-IL`). Every comparison between
//! languages in the workspace goes through [`normalize_language_tag`] first
//! so that mislabeled engine tags and page-provided tags line up.

/// Legacy ISO-639 codes still emitted by some engines and pages, mapped to
/// their current replacements.
const LEGACY_LANGUAGE_ALIASES: &[(&str, &str)] = &[("in", "id"), ("iw", "he"), ("ji", "yi")];

/// Map a legacy ISO-639 primary language code to its current code.
///
/// Codes without a known alias are returned unchanged.
#[must_use]
pub fn map_legacy_language_code(code: &str) -> &str {
    LEGACY_LANGUAGE_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == code)
        .map_or(code, |(_, current)| current)
}

/// Normalize a raw language tag into canonical BCP-47 casing.
///
/// - surrounding whitespace is trimmed and `_` separators become `-`
/// - the primary subtag is lowercased and legacy aliases are mapped
/// - four-letter script subtags are title-cased (`Hant`)
/// - two-letter or three-digit region subtags are uppercased (`GB`, `419`)
/// - everything after a singleton (`x-`, `u-`) is lowercased verbatim
///
/// Returns `None` when nothing usable remains.
#[must_use]
pub fn normalize_language_tag(raw: &str) -> Option<String> {
    let cleaned = raw.trim().replace('_', "-");
    let mut subtags = cleaned.split('-').filter(|s| !s.is_empty());

    let primary = subtags.next()?.to_ascii_lowercase();
    let mut normalized = map_legacy_language_code(&primary).to_string();

    let mut after_singleton = primary.len() == 1;
    for subtag in subtags {
        normalized.push('-');

        if after_singleton {
            normalized.push_str(&subtag.to_ascii_lowercase());
            continue;
        }

        if subtag.len() == 1 {
            after_singleton = true;
            normalized.push_str(&subtag.to_ascii_lowercase());
        } else if subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic()) {
            let mut chars = subtag.chars();
            if let Some(first) = chars.next() {
                normalized.push(first.to_ascii_uppercase());
                normalized.push_str(&chars.as_str().to_ascii_lowercase());
            }
        } else if (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
            || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
        {
            normalized.push_str(&subtag.to_ascii_uppercase());
        } else {
            normalized.push_str(&subtag.to_ascii_lowercase());
        }
    }

    Some(normalized)
}

/// The language group (primary subtag) of a tag, e.g. `en` for `en-US`.
#[must_use]
pub fn language_group(tag: &str) -> Option<String> {
    let normalized = normalize_language_tag(tag)?;
    Some(
        normalized
            .split('-')
            .next()
            .unwrap_or(normalized.as_str())
            .to_string(),
    )
}
