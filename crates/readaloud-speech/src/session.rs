//! One speech session: an ordered list of text parts spoken with one voice.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};

use readaloud_core::domain::{clamp_pitch, clamp_rate};
use readaloud_core::{
    EngineError, PartMeta, SessionEndReason, SessionId, SessionMeta, SpeechEnginePort,
    SpeechEvent, SpeechEventEmitter, Utterance, Voice,
};

use crate::engine::stop_engine;
use crate::error::SpeechError;
use crate::generation::Continuation;
use crate::queue::{SessionContext, SessionOutcome};

/// Everything needed to speak one selection.
#[derive(Debug, Clone)]
pub struct SpeechSession {
    continuation: Continuation,
    voice: Voice,
    rate: f32,
    pitch: f32,
    parts: Vec<String>,
}

/// How the part loop ended.
enum PartsEnd {
    Finished,
    Superseded,
}

impl SpeechSession {
    /// Rate and pitch are clamped into the engine bounds.
    pub fn new(
        continuation: Continuation,
        voice: Voice,
        rate: f32,
        pitch: f32,
        parts: Vec<String>,
    ) -> Self {
        Self {
            continuation,
            voice,
            rate: clamp_rate(rate),
            pitch: clamp_pitch(pitch),
            parts,
        }
    }

    pub const fn voice(&self) -> &Voice {
        &self.voice
    }

    pub const fn rate(&self) -> f32 {
        self.rate
    }

    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_superseded(&self) -> bool {
        !self.continuation.should_continue()
    }

    fn meta(&self, session_id: SessionId) -> SessionMeta {
        SessionMeta {
            session_id,
            generation: self.continuation.generation(),
            voice_name: self.voice.name.clone(),
            language: self.voice.lang.clone(),
            rate: self.rate,
            pitch: self.pitch,
            part_count: self.parts.len(),
            started_at: Utc::now(),
        }
    }

    /// Speak every part in order.
    ///
    /// A session that is already superseded when it reaches the engine ends
    /// without a sound and without events. Otherwise the engine is reset,
    /// `before_speaking` is emitted, and parts are spoken one by one with the
    /// continuation re-checked before each. `after_speaking` is emitted
    /// exactly once whatever the outcome.
    pub async fn run(
        self,
        ctx: &SessionContext,
        engine: &dyn SpeechEnginePort,
        emitter: &dyn SpeechEventEmitter,
    ) -> Result<SessionOutcome, SpeechError> {
        let session_id = ctx.id();

        if self.is_superseded() {
            debug!(%session_id, generation = self.continuation.generation(), "Session superseded before start");
            return Ok(SessionOutcome::Superseded { parts_spoken: 0 });
        }

        stop_engine(engine);

        let meta = self.meta(session_id);
        info!(
            %session_id,
            generation = meta.generation,
            voice = %meta.voice_name,
            parts = meta.part_count,
            "Speaking session"
        );
        emitter.emit(SpeechEvent::BeforeSpeaking {
            session: meta.clone(),
        });

        let mut parts_spoken = 0;
        let end = self
            .speak_parts(ctx, engine, emitter, &mut parts_spoken)
            .await;

        let (reason, outcome) = match end {
            Ok(PartsEnd::Finished) => (
                SessionEndReason::Completed,
                Ok(SessionOutcome::Completed { parts_spoken }),
            ),
            Ok(PartsEnd::Superseded) => (
                SessionEndReason::Superseded,
                Ok(SessionOutcome::Superseded { parts_spoken }),
            ),
            Err(e) => (
                SessionEndReason::Failed {
                    error: e.to_string(),
                },
                Err(SpeechError::Engine(e)),
            ),
        };

        info!(%session_id, ?reason, parts_spoken, "Session ended");
        emitter.emit(SpeechEvent::AfterSpeaking {
            session: meta,
            reason,
        });

        outcome
    }

    async fn speak_parts(
        &self,
        ctx: &SessionContext,
        engine: &dyn SpeechEnginePort,
        emitter: &dyn SpeechEventEmitter,
        parts_spoken: &mut usize,
    ) -> Result<PartsEnd, EngineError> {
        let part_count = self.parts.len();

        for (part_index, text) in self.parts.iter().enumerate() {
            if self.is_superseded() {
                debug!(session_id = %ctx.id(), part_index, "Session superseded, skipping remaining parts");
                return Ok(PartsEnd::Superseded);
            }

            ctx.mark_speaking(part_index);
            let part = PartMeta {
                session_id: ctx.id(),
                part_index,
                part_count,
                text_length: text.chars().count(),
                elapsed_ms: None,
            };
            emitter.emit(SpeechEvent::BeforePart { part: part.clone() });

            let utterance = Utterance {
                text: text.clone(),
                voice: self.voice.clone(),
                rate: self.rate,
                pitch: self.pitch,
            };

            let started = Instant::now();
            match engine.speak(&utterance).await {
                Ok(elapsed) => {
                    *parts_spoken += 1;
                    let elapsed = if elapsed.is_zero() {
                        started.elapsed()
                    } else {
                        elapsed
                    };
                    debug!(session_id = %ctx.id(), part_index, elapsed_ms = elapsed.as_millis(), "Part spoken");
                    emitter.emit(SpeechEvent::AfterPart {
                        part: PartMeta {
                            elapsed_ms: Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
                            ..part
                        },
                    });
                }
                Err(e) if self.is_superseded() => {
                    debug!(session_id = %ctx.id(), part_index, error = %e, "Part cut short by a newer request");
                    return Ok(PartsEnd::Superseded);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(PartsEnd::Finished)
    }
}
