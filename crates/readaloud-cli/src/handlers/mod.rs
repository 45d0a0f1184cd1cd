//! Command handlers.
//!
//! Handlers are thin: they turn command-line input into calls on the
//! speech service and format the result for the terminal.

pub mod speak;
pub mod split;
pub mod voices;
