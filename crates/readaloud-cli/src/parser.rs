//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Read selected text aloud.
#[derive(Parser)]
#[command(name = "readaloud")]
#[command(about = "Read text aloud with language-aware voice selection")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// JSON settings file
    #[arg(long = "settings", global = true, env = "READALOUD_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "warn,readaloud_core=debug,readaloud_speech=debug,readaloud_cli=debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "readaloud",
            "--verbose",
            "--settings",
            "/tmp/readaloud.json",
            "split",
            "Hello there.",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/readaloud.json")));
        assert!(cli.default_log_filter().contains("readaloud_speech=debug"));
    }
}
