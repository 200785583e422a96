use anyhow::Result;
use std::sync::Arc;

use super::{Session, cancel_on_ctrl_c, finish};
use crate::cache::CacheStore;
use crate::cli::InputArgs;
use crate::input::InputReader;
use crate::paths;
use crate::speech::{SpeechClient, SpeechPipeline};
use crate::ui::Spinner;

/// Synthesizes the input and prints the path of the audio file.
pub async fn run_speak(input: &InputArgs, lang: Option<&str>, session: &Session) -> Result<()> {
    let text = InputReader::read_text(input.text.as_deref(), input.file.as_deref())?;
    let language = lang.unwrap_or(&session.config.tts.language);
    let provider = session.config.speech_provider()?;

    let cache = CacheStore::open(
        paths::speech_cache_dir()?,
        session.config.tts.cache_expiration_days,
    )
    .await;
    let client = SpeechClient::new(
        reqwest::Client::new(),
        provider,
        session.config.tts_timeout(),
    );
    let pipeline = SpeechPipeline::new(Arc::new(cache), client);
    pipeline.cache().sweep().await;
    let cancel = cancel_on_ctrl_c();

    let spinner = Spinner::new("Synthesizing speech...", session.quiet);
    let outcome = pipeline.synthesize(&text, language, &cancel).await;
    spinner.stop();

    println!("{}", finish(outcome)?.display());
    Ok(())
}
