//! Subcommands.

use clap::{Args, Subcommand, ValueEnum};

/// Speech engine to drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// Print utterances instead of speaking them
    #[default]
    Console,
    /// Speak through the espeak-ng command
    Espeak,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Speak text, one selection per argument (stdin when none given)
    Speak(SpeakArgs),

    /// Show the parts a text is split into
    Split {
        /// Text to split
        text: String,
        /// Maximum part length in characters
        #[arg(long = "max")]
        max: Option<usize>,
        /// Keep paragraphs whole
        #[arg(long)]
        long: bool,
    },

    /// List the engine's voices grouped by language
    Voices {
        #[arg(long, value_enum, default_value_t)]
        engine: EngineKind,
        /// Print the raw voice list as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SpeakArgs {
    /// Text to speak
    pub texts: Vec<String>,

    /// Detected language of the text
    #[arg(long = "lang")]
    pub lang: Option<String>,

    /// Language declared by the surrounding document
    #[arg(long = "html-lang")]
    pub html_lang: Option<String>,

    /// Detected language of the whole page
    #[arg(long = "page-lang")]
    pub page_lang: Option<String>,

    /// Speak with this voice instead of resolving one by language
    #[arg(long)]
    pub voice: Option<String>,

    /// Rate multiplier
    #[arg(long)]
    pub rate: Option<f32>,

    /// Pitch
    #[arg(long)]
    pub pitch: Option<f32>,

    /// Keep paragraphs whole
    #[arg(long)]
    pub long: bool,

    #[arg(long, value_enum, default_value_t)]
    pub engine: EngineKind,
}
