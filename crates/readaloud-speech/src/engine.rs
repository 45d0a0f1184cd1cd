//! Helpers around the shared speech engine.

use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use readaloud_core::SpeechEnginePort;

/// Silence the engine: cancel whatever is speaking, then resume.
///
/// Engines that were paused would otherwise stay silent for every later
/// utterance, so `resume` follows every `cancel`.
pub fn stop_engine(engine: &dyn SpeechEnginePort) {
    engine.cancel();
    engine.resume();
}

/// One-time engine initialisation gate.
///
/// The first caller initialises the engine, bounded by a timeout; everyone
/// else waits for that attempt. A failed or timed-out initialisation is
/// logged and the engine is assumed usable anyway, since some engines never
/// report readiness.
#[derive(Debug, Default)]
pub struct EngineReadiness {
    ready: OnceCell<()>,
}

impl EngineReadiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn ensure_ready(&self, engine: &dyn SpeechEnginePort, timeout: Duration) {
        self.ready
            .get_or_init(|| async {
                match tokio::time::timeout(timeout, engine.initialize()).await {
                    Ok(Ok(())) => debug!("Speech engine ready"),
                    Ok(Err(e)) => warn!(error = %e, "Speech engine failed to initialise, continuing"),
                    Err(_) => warn!(
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "Speech engine did not report readiness in time, continuing"
                    ),
                }
            })
            .await;
    }
}
