//! CLI bootstrap - the composition root.
//!
//! The only place where the speech core is wired to a concrete engine,
//! settings source and event bus.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use readaloud_core::{
    BroadcastEmitter, NoActiveTab, Settings, SettingsUpdate, SpeechEnginePort, StaticSettings,
};
use readaloud_speech::SpeechService;

use crate::commands::EngineKind;
use crate::engines::{ConsoleEngine, EspeakEngine};
use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub settings_path: Option<PathBuf>,
    pub engine: EngineKind,
}

/// Everything command handlers need.
pub struct CliContext {
    pub service: SpeechService,
    pub settings: Arc<StaticSettings>,
    pub events: BroadcastEmitter,
}

impl CliContext {
    /// Apply command-line overrides on top of the loaded settings.
    pub fn apply(&self, update: &SettingsUpdate) -> Result<(), CliError> {
        Ok(self.settings.update(update)?)
    }
}

/// Load settings from a JSON file, or defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let Some(path) = path else {
        return Ok(Settings::with_defaults());
    };

    let json = std::fs::read_to_string(path).map_err(|source| CliError::SettingsFile {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = Settings::from_json_str(&json)?;
    debug!(path = %path.display(), "Loaded settings");
    Ok(settings)
}

fn build_engine(kind: EngineKind) -> Arc<dyn SpeechEnginePort> {
    match kind {
        EngineKind::Console => Arc::new(ConsoleEngine::new()),
        EngineKind::Espeak => Arc::new(EspeakEngine::new()),
    }
}

/// Compose the speech service. Must run inside the tokio runtime.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let settings = Arc::new(StaticSettings::new(load_settings(
        config.settings_path.as_deref(),
    )?));
    let events = BroadcastEmitter::default();

    let mut subscription = events.subscribe();
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            debug!(topic = ?event.topic(), session_id = %event.session_id(), "Speech event");
        }
    });

    let service = SpeechService::new(
        build_engine(config.engine),
        Arc::new(events.clone()),
        settings.clone(),
        Arc::new(NoActiveTab),
    );

    Ok(CliContext {
        service,
        settings,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_path_gives_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings, Settings::with_defaults());
    }

    #[test]
    fn test_load_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "speak_long_texts": true, "language_voice_overrides": {{ "en": "Daniel" }} }}"#
        )
        .unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert!(settings.effective_speak_long_texts());
        assert_eq!(settings.voice_override_for_language("en-GB"), Some("Daniel"));
        assert_eq!(settings.effective_max_part_length(), 100);
    }

    #[test]
    fn test_invalid_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_part_length": 0 }}"#).unwrap();
        assert!(matches!(
            load_settings(Some(file.path())),
            Err(CliError::Settings(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_settings(Some(&missing)),
            Err(CliError::SettingsFile { .. })
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_applies_overrides() {
        let ctx = bootstrap(&CliConfig::default()).unwrap();
        ctx.apply(&SettingsUpdate {
            max_part_length: Some(Some(20)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ctx.settings.snapshot().max_part_length, Some(20));

        let rejected = ctx.apply(&SettingsUpdate {
            default_rate: Some(Some(99.0)),
            ..Default::default()
        });
        assert!(matches!(rejected, Err(CliError::Settings(_))));
    }
}
