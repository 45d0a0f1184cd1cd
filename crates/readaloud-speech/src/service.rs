//! `SpeechService`, the orchestrator behind every speak request.
//!
//! A request flows through these steps:
//!
//! 1. draw a new generation and silence the engine
//! 2. read settings, make sure the engine is initialised, list voices
//! 3. resolve an effective language per selection (with fallbacks)
//! 4. pick a voice, rate and pitch, and split the text into parts
//! 5. enqueue one session per selection and wait for them to settle
//!
//! Steps 2 to 4 may be overtaken by a newer request at any await point;
//! sessions built for a stale generation end without speaking.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use readaloud_core::{
    ActiveTabPort, Selection, Settings, SettingsProvider, SpeechEnginePort, SpeechEventEmitter,
    TabId, Voice, VoiceReference,
};

use crate::engine::EngineReadiness;
use crate::error::SpeechError;
use crate::generation::{Continuation, GenerationCounter};
use crate::language::LanguageResolver;
use crate::queue::{PendingSession, SessionOutcome, SpeechQueue};
use crate::session::SpeechSession;
use crate::status::{SpeakingGuard, SpeakingStatus};
use crate::text_utils::speech_parts;
use crate::voices;

/// Per-request tally of how each session ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeakSummary {
    pub completed: usize,
    pub superseded: usize,
    pub failed: usize,
    /// Selections dropped before reaching the queue (no usable voice).
    pub skipped: usize,
}

impl SpeakSummary {
    pub const fn total(&self) -> usize {
        self.completed + self.superseded + self.failed + self.skipped
    }
}

/// Everything a session needs that does not change within a request.
struct RequestContext {
    continuation: Continuation,
    /// Tab the request came from, marked as speaking by each session.
    tab: Option<TabId>,
    settings: Settings,
    speak_long_texts: bool,
    voices: Vec<Voice>,
}

// ── Service ─────────────────────────────────────────────────────────────────

/// Orchestrates speech requests against one engine.
///
/// Must be created inside a tokio runtime; it owns the queue worker.
pub struct SpeechService {
    engine: Arc<dyn SpeechEnginePort>,
    emitter: Arc<dyn SpeechEventEmitter>,
    settings: Arc<dyn SettingsProvider>,
    tabs: Arc<dyn ActiveTabPort>,
    generations: GenerationCounter,
    status: SpeakingStatus,
    queue: SpeechQueue,
    readiness: EngineReadiness,
}

impl SpeechService {
    pub fn new(
        engine: Arc<dyn SpeechEnginePort>,
        emitter: Arc<dyn SpeechEventEmitter>,
        settings: Arc<dyn SettingsProvider>,
        tabs: Arc<dyn ActiveTabPort>,
    ) -> Self {
        Self::with_state(
            engine,
            emitter,
            settings,
            tabs,
            GenerationCounter::new(),
            SpeakingStatus::new(),
        )
    }

    /// Build a service around an existing generation counter and speaking
    /// status, shared with other request sources.
    pub fn with_state(
        engine: Arc<dyn SpeechEnginePort>,
        emitter: Arc<dyn SpeechEventEmitter>,
        settings: Arc<dyn SettingsProvider>,
        tabs: Arc<dyn ActiveTabPort>,
        generations: GenerationCounter,
        status: SpeakingStatus,
    ) -> Self {
        let queue = SpeechQueue::spawn(Arc::clone(&engine));
        Self {
            engine,
            emitter,
            settings,
            tabs,
            generations,
            status,
            queue,
            readiness: EngineReadiness::new(),
        }
    }

    pub const fn status(&self) -> &SpeakingStatus {
        &self.status
    }

    pub const fn generations(&self) -> &GenerationCounter {
        &self.generations
    }

    pub const fn queue(&self) -> &SpeechQueue {
        &self.queue
    }

    async fn ensure_engine_ready(&self, settings: &Settings) {
        let timeout = Duration::from_millis(settings.effective_engine_init_timeout_ms());
        self.readiness
            .ensure_ready(self.engine.as_ref(), timeout)
            .await;
    }

    /// Current voice list, after the engine has been initialised.
    pub async fn voices(&self) -> Result<Vec<Voice>, SpeechError> {
        let settings = self.settings.settings().await;
        self.ensure_engine_ready(&settings).await;
        Ok(self.engine.list_voices().await?)
    }

    /// Supersede whatever is speaking and gather what a new request needs.
    async fn begin_request(&self) -> Result<RequestContext, SpeechError> {
        let continuation = self.generations.issue();
        self.queue.stop();
        let tab = self.tabs.current_active_tab_id().await;
        debug!(generation = continuation.generation(), ?tab, "New speech request");

        let settings = self.settings.settings().await;
        let speak_long_texts = self.settings.speak_long_texts().await;
        self.ensure_engine_ready(&settings).await;
        let voices = self.engine.list_voices().await?;

        Ok(RequestContext {
            continuation,
            tab,
            settings,
            speak_long_texts,
            voices,
        })
    }

    /// Speak a batch of page selections.
    ///
    /// Each selection becomes one session. Selections whose language no
    /// installed voice speaks are replaced by a spoken notice; a batch with
    /// no text at all speaks the "no text selected" notice. Failures of
    /// individual sessions are counted in the summary, never returned.
    pub async fn speak_selections(
        &self,
        selections: Vec<Selection>,
        detected_page_language: Option<&str>,
    ) -> Result<SpeakSummary, SpeechError> {
        let request = self.begin_request().await?;
        let resolver = LanguageResolver::new(
            voices::known_voice_languages(&request.voices),
            request.settings.effective_fallback_messages(),
        );
        let batch = resolver.resolve_selections(selections, detected_page_language);

        let mut summary = SpeakSummary::default();
        let mut pending = Vec::with_capacity(batch.len());

        for item in batch {
            let language = item
                .effective_language
                .as_deref()
                .unwrap_or_else(|| request.settings.effective_ui_locale());
            let reference = preferred_reference(&request.settings, &request.voices, language);

            match self.prepare_session(&request, item.text(), &reference) {
                Ok(session) => pending.push(self.enqueue_session(session, request.tab)),
                Err(e) => {
                    warn!(error = %e, "Skipping selection");
                    summary.skipped += 1;
                }
            }
        }

        self.settle(pending, summary).await
    }

    /// Speak one text with an explicit voice reference.
    ///
    /// Blank text speaks the "no text selected" notice instead. A reference
    /// that no installed voice satisfies is returned as an error.
    pub async fn speak_text(
        &self,
        text: &str,
        reference: VoiceReference,
    ) -> Result<SpeakSummary, SpeechError> {
        let request = self.begin_request().await?;

        let (text, reference) = if text.trim().is_empty() {
            let notice = request.settings.effective_fallback_messages().no_text_selected;
            let reference = VoiceReference::by_language(notice.language);
            (notice.text, reference)
        } else {
            (text.to_string(), reference)
        };

        let session = self.prepare_session(&request, &text, &reference)?;
        let pending = vec![self.enqueue_session(session, request.tab)];
        self.settle(pending, SpeakSummary::default()).await
    }

    /// Stop speaking: supersede every outstanding session and silence the
    /// engine.
    pub fn stop(&self) {
        let continuation = self.generations.issue();
        info!(generation = continuation.generation(), "Speech stopped");
        self.queue.stop();
    }

    /// Stop speaking if the removed tab is the one speaking.
    pub fn on_tab_removed(&self, tab: TabId) -> bool {
        self.stop_if_speaking(tab, "removed")
    }

    /// Stop speaking if the tab that navigated away is the one speaking.
    pub fn on_tab_navigated(&self, tab: TabId) -> bool {
        self.stop_if_speaking(tab, "navigated")
    }

    fn stop_if_speaking(&self, tab: TabId, event: &str) -> bool {
        if self.status.is_speaking_tab(tab) {
            info!(tab_id = tab.0, event, "Speaking tab went away");
            self.stop();
            true
        } else {
            false
        }
    }

    fn prepare_session(
        &self,
        request: &RequestContext,
        text: &str,
        reference: &VoiceReference,
    ) -> Result<SpeechSession, SpeechError> {
        let voice = voices::resolve(&request.voices, reference)?.clone();
        let settings = &request.settings;

        let rate = reference
            .rate
            .unwrap_or_else(|| settings.rate_for_voice(&voice.name));
        let pitch = reference
            .pitch
            .unwrap_or_else(|| settings.pitch_for_voice(&voice.name));
        let parts = speech_parts(
            text,
            request.speak_long_texts,
            settings.effective_max_part_length(),
        );

        debug!(
            voice = %voice.name,
            %reference,
            parts = parts.len(),
            "Prepared session"
        );

        Ok(SpeechSession::new(
            request.continuation.clone(),
            voice,
            rate,
            pitch,
            parts,
        ))
    }

    fn enqueue_session(&self, session: SpeechSession, tab: Option<TabId>) -> PendingSession {
        let engine = Arc::clone(&self.engine);
        let emitter = Arc::clone(&self.emitter);
        let status = self.status.clone();

        self.queue.enqueue(move |ctx| async move {
            if session.is_superseded() {
                return Ok(SessionOutcome::Superseded { parts_spoken: 0 });
            }

            let _speaking = tab.map(|tab| SpeakingGuard::mark(&status, tab));

            session.run(&ctx, engine.as_ref(), emitter.as_ref()).await
        })
    }

    async fn settle(
        &self,
        pending: Vec<PendingSession>,
        mut summary: SpeakSummary,
    ) -> Result<SpeakSummary, SpeechError> {
        for session in pending {
            let id = session.id();
            match session.wait().await {
                Ok(SessionOutcome::Completed { .. }) => summary.completed += 1,
                Ok(SessionOutcome::Superseded { .. }) => summary.superseded += 1,
                Err(SpeechError::QueueClosed) => return Err(SpeechError::QueueClosed),
                Err(e) => {
                    debug!(session_id = %id, error = %e, "Session failed");
                    summary.failed += 1;
                }
            }
        }

        debug!(?summary, "Speech request settled");
        Ok(summary)
    }
}

/// The reference a resolved language is spoken with.
///
/// A configured voice for the language (or its group) wins when it is
/// installed; otherwise the language itself is used.
pub fn preferred_reference(settings: &Settings, voices: &[Voice], language: &str) -> VoiceReference {
    if let Some(name) = settings.voice_override_for_language(language) {
        if voices::resolve_by_name(voices, name).is_some() {
            return VoiceReference::by_name(name);
        }
        warn!(voice = name, language, "Preferred voice is not installed, using language");
    }
    VoiceReference::by_language(language)
}

impl std::fmt::Debug for SpeechService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechService")
            .field("generation", &self.generations.current())
            .field("speaking_tab", &self.status.speaking_tab())
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
