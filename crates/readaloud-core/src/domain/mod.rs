//! Core domain types.
//!
//! Pure data and pure functions: nothing in here talks to a speech engine.

pub mod language;
pub mod selection;
pub mod voice;

pub use language::{language_group, map_legacy_language_code, normalize_language_tag};
pub use selection::{EffectiveLanguageSelection, Selection, TabId};
pub use voice::{
    DEFAULT_PITCH, DEFAULT_RATE, PITCH_RANGE, RATE_RANGE, Utterance, Voice, VoiceReference,
    VoiceTarget, clamp_pitch, clamp_rate,
};
