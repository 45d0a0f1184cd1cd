//! Speech engine port.
//!
//! The engine is the only component that actually produces audio. It is a
//! process-wide shared resource: the speech queue is the only writer that
//! may call [`SpeechEnginePort::speak`], while voice-list reads may happen
//! at any time.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Utterance, Voice};

/// Errors reported by a speech engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The utterance was cancelled before it finished.
    #[error("Utterance interrupted")]
    Interrupted,

    /// The engine failed while speaking.
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// The engine cannot be reached or is not installed.
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    /// The requested voice is no longer installed.
    #[error("Voice '{name}' is not available in the engine")]
    VoiceUnavailable { name: String },
}

/// Backend-agnostic speech engine.
///
/// Implementations must be `Send + Sync` so the queue can hold them
/// across `.await` points behind an `Arc`.
#[async_trait]
pub trait SpeechEnginePort: Send + Sync {
    /// Prepare the engine.
    ///
    /// Some engines never report readiness; callers bound this with a
    /// timeout and assume the engine is ready afterwards.
    async fn initialize(&self) -> Result<(), EngineError>;

    /// Current voice list.
    ///
    /// Callable repeatedly; engines may load voices lazily on first use and
    /// the list may change between calls.
    async fn list_voices(&self) -> Result<Vec<Voice>, EngineError>;

    /// Speak one utterance, resolving on natural completion.
    ///
    /// Returns the elapsed speaking time.
    async fn speak(&self, utterance: &Utterance) -> Result<Duration, EngineError>;

    /// Cancel the active utterance, if any. An in-flight [`speak`](Self::speak)
    /// must settle promptly afterwards.
    fn cancel(&self);

    /// Resume a paused engine. Always called after [`cancel`](Self::cancel)
    /// so that a paused engine can never stay wedged.
    fn resume(&self);
}
