//! `espeak-ng` engine.
//!
//! Every utterance is one `espeak-ng` process. Cancelling drops the wait,
//! which kills the process.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use readaloud_core::{EngineError, SpeechEnginePort, Utterance, Voice};

use super::Interrupt;

const PROGRAM: &str = "espeak-ng";

/// espeak-ng speed (words per minute) at rate 1.0.
const BASE_SPEED: f32 = 175.0;

/// Parse the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
///  2  en-gb           --/M      English_(Great_Britain) gmw/en
/// ```
pub fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            match columns.as_slice() {
                [_priority, language, _gender, name, file, ..] => {
                    let mut voice = Voice::new(name.replace('_', " "), *language);
                    voice.voice_uri = (*file).to_string();
                    Some(voice)
                }
                _ => None,
            }
        })
        .collect()
}

/// espeak-ng speed for a rate multiplier.
fn speed_for(rate: f32) -> u32 {
    // Clamped into espeak-ng's accepted range, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let speed = (BASE_SPEED * rate).clamp(80.0, 450.0).round() as u32;
    speed
}

/// espeak-ng pitch (0..=99) for a pitch in 0.0..=2.0.
fn pitch_for(pitch: f32) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let value = (pitch * 50.0).clamp(0.0, 99.0).round() as u32;
    value
}

pub struct EspeakEngine {
    interrupt: Interrupt,
}

impl EspeakEngine {
    pub fn new() -> Self {
        Self {
            interrupt: Interrupt::new(),
        }
    }

    async fn run(args: &[&str]) -> Result<String, EngineError> {
        let output = Command::new(PROGRAM)
            .args(args)
            .output()
            .await
            .map_err(|e| EngineError::Unavailable(format!("{PROGRAM}: {e}")))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(EngineError::Unavailable(format!(
                "{PROGRAM} exited with {}",
                output.status
            )))
        }
    }
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEnginePort for EspeakEngine {
    async fn initialize(&self) -> Result<(), EngineError> {
        let version = Self::run(&["--version"]).await?;
        debug!(version = version.trim(), "espeak-ng available");
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, EngineError> {
        Ok(parse_voice_list(&Self::run(&["--voices"]).await?))
    }

    async fn speak(&self, utterance: &Utterance) -> Result<Duration, EngineError> {
        let epoch = self.interrupt.epoch();
        let voice = if utterance.voice.voice_uri.is_empty() {
            utterance.voice.lang.as_str()
        } else {
            utterance.voice.voice_uri.as_str()
        };

        let mut child = Command::new(PROGRAM)
            .arg("-v")
            .arg(voice)
            .arg("-s")
            .arg(speed_for(utterance.rate).to_string())
            .arg("-p")
            .arg(pitch_for(utterance.pitch).to_string())
            .arg("--")
            .arg(&utterance.text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Unavailable(format!("{PROGRAM}: {e}")))?;

        let started = Instant::now();
        tokio::select! {
            status = child.wait() => match status {
                Ok(status) if status.success() => Ok(started.elapsed()),
                Ok(status) => Err(EngineError::Synthesis(format!("{PROGRAM} exited with {status}"))),
                Err(e) => Err(EngineError::Synthesis(e.to_string())),
            },
            () = self.interrupt.cancelled_since(epoch) => Err(EngineError::Interrupted),
        }
    }

    fn cancel(&self) {
        self.interrupt.cancel();
    }

    fn resume(&self) {}
}
