//! Settings domain types and validation.
//!
//! This module contains the runtime settings consumed by the speech core.
//! These are pure domain types with no storage concerns: how settings are
//! persisted (and migrated) is the adapter's business.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{PITCH_RANGE, RATE_RANGE, language_group, normalize_language_tag};

/// Default maximum length, in characters, of one spoken text part.
pub const DEFAULT_MAX_PART_LENGTH: usize = 100;

/// Default time to wait for the engine to report readiness.
pub const DEFAULT_ENGINE_INIT_TIMEOUT_MS: u64 = 1000;

/// Default locale of the fallback messages.
pub const DEFAULT_UI_LOCALE: &str = "en";

/// A fixed message spoken in place of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackMessage {
    pub text: String,
    pub language: String,
}

/// The fixed messages used when a selection cannot be spoken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackMessages {
    /// Spoken when a request carries no usable text at all.
    pub no_text_selected: FallbackMessage,
    /// Spoken in place of a selection whose language no voice supports.
    pub no_voice_for_language: FallbackMessage,
}

impl FallbackMessages {
    /// English messages.
    #[must_use]
    pub fn english() -> Self {
        Self {
            no_text_selected: FallbackMessage {
                text: "No text selected. Select some text and try again.".to_string(),
                language: DEFAULT_UI_LOCALE.to_string(),
            },
            no_voice_for_language: FallbackMessage {
                text: "No voice is installed for the language of the selected text.".to_string(),
                language: DEFAULT_UI_LOCALE.to_string(),
            },
        }
    }
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self::english()
    }
}

/// Runtime settings for the speech core.
///
/// All fields are optional to support partial files and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Speak whole paragraphs instead of short, bounded parts.
    pub speak_long_texts: Option<bool>,

    /// Maximum characters per part when `speak_long_texts` is off.
    pub max_part_length: Option<usize>,

    /// Rate used when neither the request nor a voice override sets one.
    pub default_rate: Option<f32>,

    /// Pitch used when neither the request nor a voice override sets one.
    pub default_pitch: Option<f32>,

    /// Locale of the extension UI.
    pub ui_locale: Option<String>,

    /// Milliseconds to wait for the engine to initialise.
    pub engine_init_timeout_ms: Option<u64>,

    /// Preferred voice name per language or language group.
    pub language_voice_overrides: BTreeMap<String, String>,

    /// Rate per voice name.
    pub voice_rate_overrides: BTreeMap<String, f32>,

    /// Pitch per voice name.
    pub voice_pitch_overrides: BTreeMap<String, f32>,

    /// Messages spoken when a selection cannot be spoken as-is.
    pub fallback_messages: Option<FallbackMessages>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            speak_long_texts: Some(false),
            max_part_length: Some(DEFAULT_MAX_PART_LENGTH),
            default_rate: Some(1.0),
            default_pitch: Some(1.0),
            ui_locale: Some(DEFAULT_UI_LOCALE.to_string()),
            engine_init_timeout_ms: Some(DEFAULT_ENGINE_INIT_TIMEOUT_MS),
            language_voice_overrides: BTreeMap::new(),
            voice_rate_overrides: BTreeMap::new(),
            voice_pitch_overrides: BTreeMap::new(),
            fallback_messages: None,
        }
    }

    /// Parse settings from JSON, then validate them.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    #[must_use]
    pub fn effective_speak_long_texts(&self) -> bool {
        self.speak_long_texts.unwrap_or(false)
    }

    #[must_use]
    pub fn effective_max_part_length(&self) -> usize {
        self.max_part_length.unwrap_or(DEFAULT_MAX_PART_LENGTH)
    }

    #[must_use]
    pub fn effective_engine_init_timeout_ms(&self) -> u64 {
        self.engine_init_timeout_ms
            .unwrap_or(DEFAULT_ENGINE_INIT_TIMEOUT_MS)
    }

    #[must_use]
    pub fn effective_ui_locale(&self) -> &str {
        self.ui_locale.as_deref().unwrap_or(DEFAULT_UI_LOCALE)
    }

    /// Fallback messages, localized to the UI locale when none are configured.
    #[must_use]
    pub fn effective_fallback_messages(&self) -> FallbackMessages {
        self.fallback_messages.clone().unwrap_or_else(|| {
            let mut messages = FallbackMessages::english();
            let locale = self.effective_ui_locale().to_string();
            messages.no_text_selected.language.clone_from(&locale);
            messages.no_voice_for_language.language = locale;
            messages
        })
    }

    /// Rate for a voice: per-voice override, else the default.
    #[must_use]
    pub fn rate_for_voice(&self, voice_name: &str) -> f32 {
        self.voice_rate_overrides
            .get(voice_name)
            .copied()
            .or(self.default_rate)
            .unwrap_or(1.0)
    }

    /// Pitch for a voice: per-voice override, else the default.
    #[must_use]
    pub fn pitch_for_voice(&self, voice_name: &str) -> f32 {
        self.voice_pitch_overrides
            .get(voice_name)
            .copied()
            .or(self.default_pitch)
            .unwrap_or(1.0)
    }

    /// Preferred voice name for a language: exact language first, then its
    /// language group. Keys are compared in normalized form.
    #[must_use]
    pub fn voice_override_for_language(&self, language: &str) -> Option<&str> {
        let normalized = normalize_language_tag(language)?;
        let group = language_group(&normalized)?;

        let lookup = |wanted: &str| {
            self.language_voice_overrides
                .iter()
                .find(|(key, _)| normalize_language_tag(key).as_deref() == Some(wanted))
                .map(|(_, voice)| voice.as_str())
        };

        lookup(&normalized).or_else(|| lookup(&group))
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref long) = other.speak_long_texts {
            self.speak_long_texts = *long;
        }
        if let Some(ref max) = other.max_part_length {
            self.max_part_length = *max;
        }
        if let Some(ref rate) = other.default_rate {
            self.default_rate = *rate;
        }
        if let Some(ref pitch) = other.default_pitch {
            self.default_pitch = *pitch;
        }
        if let Some(ref locale) = other.ui_locale {
            self.ui_locale.clone_from(locale);
        }
        if let Some(ref timeout) = other.engine_init_timeout_ms {
            self.engine_init_timeout_ms = *timeout;
        }
        if let Some(ref overrides) = other.language_voice_overrides {
            self.language_voice_overrides.clone_from(overrides);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub speak_long_texts: Option<Option<bool>>,
    pub max_part_length: Option<Option<usize>>,
    pub default_rate: Option<Option<f32>>,
    pub default_pitch: Option<Option<f32>>,
    pub ui_locale: Option<Option<String>>,
    pub engine_init_timeout_ms: Option<Option<u64>>,
    pub language_voice_overrides: Option<BTreeMap<String, String>>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Rate must be between 0.1 and 10, got {0}")]
    InvalidRate(f32),

    #[error("Pitch must be between 0 and 2, got {0}")]
    InvalidPitch(f32),

    #[error("Max part length must be at least 1")]
    InvalidMaxPartLength,

    #[error("UI locale cannot be empty")]
    EmptyLocale,

    #[error("Invalid settings file: {0}")]
    Parse(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    let rates = settings
        .default_rate
        .iter()
        .chain(settings.voice_rate_overrides.values());
    for &rate in rates {
        if !RATE_RANGE.contains(&rate) {
            return Err(SettingsError::InvalidRate(rate));
        }
    }

    let pitches = settings
        .default_pitch
        .iter()
        .chain(settings.voice_pitch_overrides.values());
    for &pitch in pitches {
        if !PITCH_RANGE.contains(&pitch) {
            return Err(SettingsError::InvalidPitch(pitch));
        }
    }

    if settings.max_part_length == Some(0) {
        return Err(SettingsError::InvalidMaxPartLength);
    }

    if settings
        .ui_locale
        .as_ref()
        .is_some_and(|l| l.trim().is_empty())
    {
        return Err(SettingsError::EmptyLocale);
    }

    Ok(())
}
