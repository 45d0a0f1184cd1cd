//! CLI-specific error types and exit codes.

use std::path::PathBuf;

use thiserror::Error;

use readaloud_core::SettingsError;
use readaloud_speech::SpeechError;

#[derive(Debug, Error)]
pub enum CliError {
    /// The settings file could not be read.
    #[error("Cannot read settings file {}: {source}", path.display())]
    SettingsFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The settings file or a command-line override is invalid.
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    /// Speaking failed.
    #[error(transparent)]
    Speech(#[from] SpeechError),

    /// Reading text from standard input failed.
    #[error("Cannot read text from stdin: {0}")]
    Stdin(std::io::Error),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// - 2: invalid input (settings, arguments)
    /// - 3: no voice for the request
    /// - 1: anything else
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::SettingsFile { .. } | Self::Settings(_) | Self::Stdin(_) => 2,
            Self::Speech(SpeechError::VoiceNotFound { .. }) => 3,
            Self::Speech(_) => 1,
        }
    }
}
