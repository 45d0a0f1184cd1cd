//! Split command handler.

use readaloud_core::Settings;
use readaloud_speech::speech_parts;

/// The parts `text` is spoken in.
pub fn parts(text: &str, max: Option<usize>, long: bool, settings: &Settings) -> Vec<String> {
    let max = max.unwrap_or_else(|| settings.effective_max_part_length());
    speech_parts(
        text,
        long || settings.effective_speak_long_texts(),
        max.max(1),
    )
}

/// Print each part with its length.
pub fn execute(text: &str, max: Option<usize>, long: bool, settings: &Settings) {
    let parts = parts(text, max, long, settings);
    let max_length = max.unwrap_or_else(|| settings.effective_max_part_length());
    if parts.is_empty() {
        println!("No text to speak.");
        return;
    }

    let width = parts.len().to_string().len();
    for (index, part) in parts.iter().enumerate() {
        println!(
            "{:>width$}. [{:>3}] {}",
            index + 1,
            part.chars().count(),
            part
        );
    }
    println!(
        "\n{} part(s), max length {max_length}",
        parts.len()
    );
}
