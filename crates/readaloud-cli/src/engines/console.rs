//! Dry-run engine: prints utterances and takes as long as speaking would.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use readaloud_core::{EngineError, SpeechEnginePort, Utterance, Voice};

use super::Interrupt;

/// Speaking speed at rate 1.0.
const WORDS_PER_MINUTE: f64 = 180.0;

pub struct ConsoleEngine {
    voices: Vec<Voice>,
    words_per_minute: f64,
    interrupt: Interrupt,
}

impl ConsoleEngine {
    pub fn new() -> Self {
        Self::with_speed(WORDS_PER_MINUTE)
    }

    /// An engine speaking `words_per_minute` at rate 1.0.
    pub fn with_speed(words_per_minute: f64) -> Self {
        Self {
            voices: vec![
                Voice::new("Console English (US)", "en-US").as_default(),
                Voice::new("Console English (GB)", "en-GB"),
                Voice::new("Console Deutsch", "de-DE"),
                Voice::new("Console Français", "fr-FR"),
                Voice::new("Console Español", "es-ES"),
            ],
            words_per_minute: words_per_minute.max(1.0),
            interrupt: Interrupt::new(),
        }
    }

    /// How long speaking `utterance` takes.
    pub fn duration_of(&self, utterance: &Utterance) -> Duration {
        let words = utterance.text.split_whitespace().count();
        #[allow(clippy::cast_precision_loss)]
        let seconds = words as f64 * 60.0 / (self.words_per_minute * f64::from(utterance.rate).max(0.1));
        Duration::from_secs_f64(seconds)
    }
}

impl Default for ConsoleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEnginePort for ConsoleEngine {
    async fn initialize(&self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, EngineError> {
        Ok(self.voices.clone())
    }

    async fn speak(&self, utterance: &Utterance) -> Result<Duration, EngineError> {
        let epoch = self.interrupt.epoch();
        if !self.voices.iter().any(|voice| voice.name == utterance.voice.name) {
            return Err(EngineError::VoiceUnavailable {
                name: utterance.voice.name.clone(),
            });
        }

        println!(
            "[{} x{:.2} ^{:.2}] {}",
            utterance.voice.name, utterance.rate, utterance.pitch, utterance.text
        );

        let started = Instant::now();
        tokio::select! {
            () = tokio::time::sleep(self.duration_of(utterance)) => Ok(started.elapsed()),
            () = self.interrupt.cancelled_since(epoch) => Err(EngineError::Interrupted),
        }
    }

    fn cancel(&self) {
        self.interrupt.cancel();
    }

    fn resume(&self) {}
}
