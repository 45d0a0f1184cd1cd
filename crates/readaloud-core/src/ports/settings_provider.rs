//! Settings provider port.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::settings::{Settings, SettingsError, SettingsUpdate, validate_settings};

/// Source of the settings the speech core reads at the start of every
/// request.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Current settings snapshot.
    async fn settings(&self) -> Settings;

    /// Whether whole paragraphs are spoken instead of short bounded parts.
    async fn speak_long_texts(&self) -> bool {
        self.settings().await.effective_speak_long_texts()
    }
}

/// In-memory settings, updated through [`SettingsUpdate`]s.
#[derive(Debug, Default)]
pub struct StaticSettings {
    inner: RwLock<Settings>,
}

impl StaticSettings {
    pub const fn new(settings: Settings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Apply a partial update. The update is rejected as a whole if the
    /// merged settings do not validate.
    pub fn update(&self, update: &SettingsUpdate) -> Result<(), SettingsError> {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut merged = guard.clone();
        merged.merge(update);
        validate_settings(&merged)?;
        *guard = merged;
        Ok(())
    }

    /// Synchronous snapshot.
    pub fn snapshot(&self) -> Settings {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SettingsProvider for StaticSettings {
    async fn settings(&self) -> Settings {
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_speak_long_texts_default_method() {
        let provider = StaticSettings::new(Settings::with_defaults());
        assert!(!provider.speak_long_texts().await);

        provider
            .update(&SettingsUpdate {
                speak_long_texts: Some(Some(true)),
                ..Default::default()
            })
            .unwrap();
        assert!(provider.speak_long_texts().await);
    }

    #[test]
    fn test_invalid_update_is_rejected_whole() {
        let provider = StaticSettings::new(Settings::with_defaults());
        let result = provider.update(&SettingsUpdate {
            speak_long_texts: Some(Some(true)),
            max_part_length: Some(Some(0)),
            ..Default::default()
        });
        assert_eq!(result, Err(SettingsError::InvalidMaxPartLength));
        assert_eq!(provider.snapshot().speak_long_texts, Some(false));
    }
}
