//! Shared test doubles for the speech integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::Notify;

use readaloud_core::{
    ActiveTabPort, EngineError, Settings, SettingsProvider, SpeechEnginePort, TabId, Utterance,
    Voice,
};

// ── Mock engine ────────────────────────────────────────────────────

/// A speech engine that records every utterance and answers instantly.
///
/// `hold_next` makes the next `speak` block until the engine is cancelled,
/// which is how the tests keep a session mid-utterance.
#[derive(Default)]
pub struct MockEngine {
    voices: Vec<Voice>,
    spoken: Mutex<Vec<Utterance>>,
    fail_on: Mutex<Option<String>>,
    init_delay: Option<Duration>,
    hold: AtomicBool,
    hold_on: Mutex<Option<String>>,
    speaking: AtomicBool,
    interrupt: Notify,
    started: Notify,
    pub initialized: AtomicUsize,
    pub cancels: AtomicUsize,
    pub resumes: AtomicUsize,
}

impl MockEngine {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Default::default()
        }
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = Some(delay);
        self
    }

    /// Fail any utterance with exactly this text.
    pub fn fail_on(&self, text: &str) {
        *self.fail_on.lock().unwrap() = Some(text.to_string());
    }

    pub fn hold_next(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Hold the first utterance with exactly this text.
    pub fn hold_on(&self, text: &str) {
        *self.hold_on.lock().unwrap() = Some(text.to_string());
    }

    fn should_hold(&self, text: &str) -> bool {
        let mut hold_on = self.hold_on.lock().unwrap();
        if hold_on.as_deref() == Some(text) {
            *hold_on = None;
            return true;
        }
        self.hold.swap(false, Ordering::SeqCst)
    }

    /// Wait until a held utterance has started.
    pub async fn wait_until_held(&self) {
        self.started.notified().await;
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|u| u.text).collect()
    }
}

#[async_trait]
impl SpeechEnginePort for MockEngine {
    async fn initialize(&self) -> Result<(), EngineError> {
        self.initialized.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.init_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, EngineError> {
        Ok(self.voices.clone())
    }

    async fn speak(&self, utterance: &Utterance) -> Result<Duration, EngineError> {
        self.spoken.lock().unwrap().push(utterance.clone());

        if self.fail_on.lock().unwrap().as_deref() == Some(utterance.text.as_str()) {
            return Err(EngineError::Synthesis("voice crashed".to_string()));
        }

        if self.should_hold(&utterance.text) {
            self.speaking.store(true, Ordering::SeqCst);
            self.started.notify_one();
            self.interrupt.notified().await;
            self.speaking.store(false, Ordering::SeqCst);
            return Err(EngineError::Interrupted);
        }

        Ok(Duration::from_millis(1))
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        if self.speaking.load(Ordering::SeqCst) {
            self.interrupt.notify_one();
        }
    }

    fn resume(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Mocked ports ───────────────────────────────────────────────────

mock! {
    pub SettingsSource {}

    #[async_trait]
    impl SettingsProvider for SettingsSource {
        async fn settings(&self) -> Settings;
    }
}

mock! {
    pub ActiveTab {}

    #[async_trait]
    impl ActiveTabPort for ActiveTab {
        async fn current_active_tab_id(&self) -> Option<TabId>;
    }
}

/// Settings source that always answers `settings`.
pub fn settings_source(settings: Settings) -> MockSettingsSource {
    let mut source = MockSettingsSource::new();
    source
        .expect_settings()
        .returning(move || settings.clone());
    source
}

pub fn active_tab(tab: Option<TabId>) -> MockActiveTab {
    let mut tabs = MockActiveTab::new();
    tabs.expect_current_active_tab_id().returning(move || tab);
    tabs
}

pub fn english_voices() -> Vec<Voice> {
    vec![
        Voice::new("Samantha", "en-US").as_default(),
        Voice::new("Daniel", "en-GB"),
        Voice::new("Anna", "de-DE"),
    ]
}
