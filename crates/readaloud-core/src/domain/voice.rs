//! Voice domain types.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::language::normalize_language_tag;

/// Default speaking rate multiplier.
pub const DEFAULT_RATE: f32 = 1.0;

/// Default speaking pitch.
pub const DEFAULT_PITCH: f32 = 1.0;

/// Rate multipliers accepted by speech engines.
pub const RATE_RANGE: RangeInclusive<f32> = 0.1..=10.0;

/// Pitch values accepted by speech engines.
pub const PITCH_RANGE: RangeInclusive<f32> = 0.0..=2.0;

/// Clamp a rate into [`RATE_RANGE`]. Non-finite values fall back to the default.
#[must_use]
pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_finite() {
        rate.clamp(*RATE_RANGE.start(), *RATE_RANGE.end())
    } else {
        DEFAULT_RATE
    }
}

/// Clamp a pitch into [`PITCH_RANGE`]. Non-finite values fall back to the default.
#[must_use]
pub fn clamp_pitch(pitch: f32) -> f32 {
    if pitch.is_finite() {
        pitch.clamp(*PITCH_RANGE.start(), *PITCH_RANGE.end())
    } else {
        DEFAULT_PITCH
    }
}

/// A concrete voice installed in the speech engine.
///
/// Voices must always come from the engine's live voice list; the list can
/// change after the engine has initialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Engine-facing voice name.
    pub name: String,

    /// Raw language tag as reported by the engine (may be mislabeled).
    pub lang: String,

    /// Whether the engine marks this voice as its default.
    #[serde(default)]
    pub is_default: bool,

    /// Whether synthesis happens locally (as opposed to a remote service).
    #[serde(default)]
    pub is_local_service: bool,

    /// Engine-specific voice URI.
    #[serde(default)]
    pub voice_uri: String,
}

impl Voice {
    /// Create a local, non-default voice with the name doubling as URI.
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            voice_uri: name.clone(),
            name,
            lang: lang.into(),
            is_default: false,
            is_local_service: true,
        }
    }

    /// Mark this voice as the engine default.
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// The voice language in canonical form, if the engine reported one.
    #[must_use]
    pub fn normalized_language(&self) -> Option<String> {
        normalize_language_tag(&self.lang)
    }
}

/// What a [`VoiceReference`] points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum VoiceTarget {
    /// An exact voice name.
    Name(String),
    /// A language (or language group) that some installed voice speaks.
    Language(String),
}

/// An abstract reference to a voice, resolved against the live voice list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceReference {
    /// The name or language to resolve.
    pub target: VoiceTarget,

    /// Explicit rate; overrides preferences when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,

    /// Explicit pitch; overrides preferences when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
}

impl VoiceReference {
    /// Reference a voice by its exact name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            target: VoiceTarget::Name(name.into()),
            rate: None,
            pitch: None,
        }
    }

    /// Reference a voice by language.
    pub fn by_language(language: impl Into<String>) -> Self {
        Self {
            target: VoiceTarget::Language(language.into()),
            rate: None,
            pitch: None,
        }
    }

    #[must_use]
    pub const fn with_rate(mut self, rate: f32) -> Self {
        self.rate = Some(rate);
        self
    }

    #[must_use]
    pub const fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }
}

impl fmt::Display for VoiceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            VoiceTarget::Name(name) => write!(f, "voice named '{name}'"),
            VoiceTarget::Language(lang) => write!(f, "voice for language '{lang}'"),
        }
    }
}

/// One call to the speech engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Text to speak (one text part).
    pub text: String,
    /// Voice to speak with.
    pub voice: Voice,
    /// Rate multiplier, already clamped.
    pub rate: f32,
    /// Pitch, already clamped.
    pub pitch: f32,
}
