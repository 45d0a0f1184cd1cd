//! Speech lifecycle events.
//!
//! These are the fire-and-forget notifications the speech queue broadcasts
//! around every session and every text part. UI adapters (icon state,
//! progress bars) and the speaking-status wiring consume them.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "before_part", "part": { "sessionId": 3, "partIndex": 0, ... } }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one speech session, unique within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Description of a whole speech session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    pub session_id: SessionId,
    /// Generation the session was issued under.
    pub generation: u64,
    pub voice_name: String,
    /// Voice language as reported by the engine.
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub part_count: usize,
    pub started_at: DateTime<Utc>,
}

/// Description of one text part within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartMeta {
    pub session_id: SessionId,
    pub part_index: usize,
    pub part_count: usize,
    /// Length of the part in characters.
    pub text_length: usize,
    /// Engine-reported speaking time; only set on `after_part`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

/// Why a session stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SessionEndReason {
    /// Every part was spoken.
    Completed,
    /// A newer session was issued before all parts were spoken.
    Superseded,
    /// The engine failed on a part.
    Failed { error: String },
}

/// Event topics, for subscribers that only care about part of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechTopic {
    BeforeSpeaking,
    BeforePart,
    AfterPart,
    AfterSpeaking,
}

/// Canonical speech lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechEvent {
    /// A session is about to speak its first part.
    BeforeSpeaking { session: SessionMeta },

    /// A part is about to be handed to the engine.
    BeforePart { part: PartMeta },

    /// The engine finished a part.
    AfterPart { part: PartMeta },

    /// A session has ended, whatever the reason.
    AfterSpeaking {
        session: SessionMeta,
        #[serde(flatten)]
        reason: SessionEndReason,
    },
}

impl SpeechEvent {
    /// The topic this event is published under.
    #[must_use]
    pub const fn topic(&self) -> SpeechTopic {
        match self {
            Self::BeforeSpeaking { .. } => SpeechTopic::BeforeSpeaking,
            Self::BeforePart { .. } => SpeechTopic::BeforePart,
            Self::AfterPart { .. } => SpeechTopic::AfterPart,
            Self::AfterSpeaking { .. } => SpeechTopic::AfterSpeaking,
        }
    }

    /// The session this event belongs to.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        match self {
            Self::BeforeSpeaking { session } | Self::AfterSpeaking { session, .. } => {
                session.session_id
            }
            Self::BeforePart { part } | Self::AfterPart { part } => part.session_id,
        }
    }
}
