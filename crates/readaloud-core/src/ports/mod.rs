//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces that the speech core expects from the host
//! environment. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No browser or engine types in any signature
//! - Event emission is infallible for the caller
//! - Only the speech queue calls [`SpeechEnginePort::speak`]

pub mod active_tab;
pub mod event_emitter;
pub mod settings_provider;
pub mod speech_engine;

pub use active_tab::{ActiveTabPort, ManualActiveTab, NoActiveTab};
pub use event_emitter::{
    BroadcastEmitter, DEFAULT_EVENT_CAPACITY, EventSubscription, NoopEmitter, SpeechEventEmitter,
};
pub use settings_provider::{SettingsProvider, StaticSettings};
pub use speech_engine::{EngineError, SpeechEnginePort};
