//! Concrete speech engines.

pub mod console;
pub mod espeak;
mod interrupt;

pub use console::ConsoleEngine;
pub use espeak::{EspeakEngine, parse_voice_list};
pub(crate) use interrupt::Interrupt;
