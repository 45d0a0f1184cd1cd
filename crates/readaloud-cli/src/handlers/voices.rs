//! Voices command handler.

use std::fmt::Write;

use anyhow::Result;

use readaloud_core::Voice;
use readaloud_speech::voices::{languages_by_group, voices_by_language};

use crate::bootstrap::CliContext;

/// Render voices grouped by language group, then language.
pub fn render(voices: &[Voice]) -> String {
    let by_language = voices_by_language(voices);
    let mut out = String::new();

    for (group, languages) in languages_by_group(voices) {
        out.push_str(&group);
        out.push('\n');
        for language in languages {
            let names: Vec<String> = by_language
                .get(&language)
                .into_iter()
                .flatten()
                .map(|voice| {
                    if voice.is_default {
                        format!("{} (default)", voice.name)
                    } else {
                        voice.name.clone()
                    }
                })
                .collect();
            let _ = writeln!(out, "  {language:<8} {}", names.join(", "));
        }
    }
    out
}

/// List the engine's voices.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let voices = ctx.service.voices().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&voices)?);
        return Ok(());
    }

    if voices.is_empty() {
        println!("The engine reports no voices.");
        return Ok(());
    }

    println!("{} voice(s):\n", voices.len());
    print!("{}", render(&voices));
    Ok(())
}
