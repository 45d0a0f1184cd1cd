//! Speech orchestration for readaloud.
//!
//! Turns page selections into spoken text: segments text into parts,
//! resolves the language and voice for each selection, and speaks the
//! resulting sessions one at a time through a single queue. A newer request
//! always supersedes an older one, part by part.
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;

pub mod engine;
pub mod error;
pub mod generation;
pub mod language;
pub mod queue;
pub mod service;
pub mod session;
pub mod status;
pub mod text_utils;
pub mod voices;

// Re-export key types for convenience
pub use engine::{EngineReadiness, stop_engine};
pub use error::SpeechError;
pub use generation::{Continuation, GenerationCounter};
pub use language::{LanguageResolver, cleanup_languages, resolve_effective_language};
pub use queue::{
    PendingSession, SessionContext, SessionOutcome, SessionSnapshot, SessionState, SpeechQueue,
};
pub use service::{SpeakSummary, SpeechService, preferred_reference};
pub use session::SpeechSession;
pub use status::{MarkOutcome, SpeakingGuard, SpeakingStatus};
pub use text_utils::{is_natural_pause, speech_parts, split_to_bounded_parts, split_to_paragraphs};
