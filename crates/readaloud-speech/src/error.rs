//! Speech core error types.

use readaloud_core::{EngineError, SessionId, VoiceReference};

/// Errors that can occur while orchestrating speech.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeechError {
    /// No installed voice satisfies the reference.
    #[error("No {reference} is installed")]
    VoiceNotFound { reference: VoiceReference },

    /// The engine failed while speaking or listing voices.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The queue worker is gone; no more sessions can run.
    #[error("Speech queue is closed")]
    QueueClosed,

    /// A session task panicked. The queue keeps running.
    #[error("Speech session {session_id} panicked")]
    SessionPanicked { session_id: SessionId },
}
