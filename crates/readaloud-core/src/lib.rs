//! Core domain types and port definitions for readaloud.
//!
//! This crate holds everything the speech core shares with its adapters:
//! selections, voices and language tags, the lifecycle event union, runtime
//! settings, and the traits (ports) the host environment implements.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    EffectiveLanguageSelection, Selection, TabId, Utterance, Voice, VoiceReference, VoiceTarget,
    language_group, normalize_language_tag,
};
pub use events::{PartMeta, SessionEndReason, SessionId, SessionMeta, SpeechEvent, SpeechTopic};
pub use ports::{
    ActiveTabPort, BroadcastEmitter, EngineError, EventSubscription, ManualActiveTab, NoActiveTab,
    NoopEmitter, SettingsProvider, SpeechEnginePort, SpeechEventEmitter,
    StaticSettings,
};
pub use settings::{
    DEFAULT_MAX_PART_LENGTH, FallbackMessage, FallbackMessages, Settings, SettingsError,
    SettingsUpdate, validate_settings,
};
