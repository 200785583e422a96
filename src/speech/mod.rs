//! Text-to-speech: provider clients and the cache-first pipeline.

mod pipeline;
mod provider;

pub use pipeline::SpeechPipeline;
pub use provider::{GOOGLE_TTS_ENDPOINT, SpeechClient, SpeechProvider};
