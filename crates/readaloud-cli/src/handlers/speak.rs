//! Speak command handler.

use anyhow::Result;
use tokio::io::AsyncReadExt;
use tracing::info;

use readaloud_core::{Selection, SettingsUpdate, VoiceReference};
use readaloud_speech::SpeakSummary;

use crate::bootstrap::CliContext;
use crate::commands::SpeakArgs;
use crate::error::CliError;

/// One selection per text, carrying the language hints from the arguments.
pub fn selections(args: &SpeakArgs, texts: Vec<String>) -> Vec<Selection> {
    texts
        .into_iter()
        .map(|text| {
            let mut selection = Selection::new(text);
            selection.html_tag_language.clone_from(&args.html_lang);
            selection.detected_text_language.clone_from(&args.lang);
            selection
        })
        .collect()
}

/// An explicit voice reference, when `--voice` is given.
pub fn voice_reference(args: &SpeakArgs) -> Option<VoiceReference> {
    let mut reference = VoiceReference::by_name(args.voice.clone()?);
    reference.rate = args.rate;
    reference.pitch = args.pitch;
    Some(reference)
}

/// Settings overrides from the arguments. Rate and pitch go through the
/// voice reference instead when a voice is named.
pub fn settings_update(args: &SpeakArgs) -> SettingsUpdate {
    let by_voice = args.voice.is_some();
    SettingsUpdate {
        speak_long_texts: args.long.then_some(Some(true)),
        default_rate: args.rate.filter(|_| !by_voice).map(Some),
        default_pitch: args.pitch.filter(|_| !by_voice).map(Some),
        ..Default::default()
    }
}

pub fn describe(summary: &SpeakSummary) -> String {
    format!(
        "Spoke {} of {} selection(s) ({} superseded, {} failed, {} skipped)",
        summary.completed,
        summary.total(),
        summary.superseded,
        summary.failed,
        summary.skipped
    )
}

async fn read_stdin() -> Result<String, CliError> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(CliError::Stdin)?;
    Ok(text)
}

/// Speak the given texts (or stdin). Ctrl-C stops speaking.
pub async fn execute(ctx: &CliContext, args: SpeakArgs) -> Result<()> {
    ctx.apply(&settings_update(&args))?;

    let texts = if args.texts.is_empty() {
        vec![read_stdin().await?]
    } else {
        args.texts.clone()
    };

    let service = &ctx.service;
    let request = async {
        match voice_reference(&args) {
            Some(reference) => service.speak_text(&texts.join("\n"), reference).await,
            None => {
                service
                    .speak_selections(selections(&args, texts), args.page_lang.as_deref())
                    .await
            }
        }
    };
    tokio::pin!(request);

    let finished = tokio::select! {
        result = &mut request => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    let result = match finished {
        Some(result) => result,
        None => {
            info!("Interrupted, stopping speech");
            service.stop();
            request.await
        }
    };

    let summary = result.map_err(CliError::from)?;
    println!("{}", describe(&summary));
    Ok(())
}
