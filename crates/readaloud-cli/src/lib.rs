//! Command-line front end for readaloud.
//!
//! Wires the speech core to a concrete engine and exposes `speak`, `split`
//! and `voices` subcommands.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary only
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod engines;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, load_settings};
pub use commands::{Commands, EngineKind, SpeakArgs};
pub use error::CliError;
pub use parser::Cli;
