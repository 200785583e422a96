use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::cancel::CancelSignal;
use crate::error::{ApiError, RequestOutcome};

pub const GOOGLE_TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// The speech backends this client can talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechProvider {
    /// Translate-style GET endpoint returning MP3.
    Google { endpoint: String },
    /// OpenAI-compatible `/v1/audio/speech` endpoint (LocalAI and friends).
    LocalAi {
        endpoint: String,
        model: String,
        response_format: String,
    },
}

impl SpeechProvider {
    /// Identifier used in cache keys and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Google { .. } => "google",
            Self::LocalAi { .. } => "localai",
        }
    }

    /// File extension of the audio this provider returns.
    pub fn extension(&self) -> &str {
        match self {
            Self::Google { .. } => "mp3",
            Self::LocalAi {
                response_format, ..
            } => response_format,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Google { endpoint } | Self::LocalAi { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    response_format: &'a str,
}

/// Downloads synthesized speech from one provider.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    http: Client,
    provider: SpeechProvider,
    timeout: Duration,
}

impl SpeechClient {
    pub const fn new(http: Client, provider: SpeechProvider, timeout: Duration) -> Self {
        Self {
            http,
            provider,
            timeout,
        }
    }

    pub const fn provider(&self) -> &SpeechProvider {
        &self.provider
    }

    /// Synthesizes `text` and writes the audio to `dest`.
    pub async fn synthesize_to(
        &self,
        text: &str,
        language: &str,
        dest: &Path,
        cancel: &CancelSignal,
    ) -> RequestOutcome<()> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ApiError::Cancelled),
            outcome = self.download(text, language, dest) => outcome,
        }
    }

    fn request(&self, text: &str, language: &str) -> RequestBuilder {
        let builder = match &self.provider {
            SpeechProvider::Google { endpoint } => self.http.get(endpoint).query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", text),
            ]),
            SpeechProvider::LocalAi {
                endpoint,
                model,
                response_format,
            } => self.http.post(endpoint).json(&SpeechRequest {
                model,
                input: text,
                response_format,
            }),
        };
        builder.timeout(self.timeout)
    }

    async fn download(&self, text: &str, language: &str, dest: &Path) -> RequestOutcome<()> {
        let label = self.provider.name();
        let timeout_seconds = self.timeout.as_secs();
        let to_error = |err: reqwest::Error| ApiError::from_reqwest(label, timeout_seconds, &err);
        let to_artifact_error = |err: std::io::Error| ApiError::Artifact {
            path: dest.to_path_buf(),
            reason: err.to_string(),
        };

        debug!(provider = label, endpoint = self.provider.endpoint(), "Requesting speech");
        let response = self
            .request(text, language)
            .send()
            .await
            .map_err(to_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(status));
        }

        let mut file = File::create(dest).await.map_err(to_artifact_error)?;
        let mut stream = response.bytes_stream();
        let mut written = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(to_error)?;
            file.write_all(&chunk).await.map_err(to_artifact_error)?;
            written += chunk.len();
        }
        file.flush().await.map_err(to_artifact_error)?;

        if written == 0 {
            return Err(ApiError::Parse(format!(
                "{label} returned an empty audio body"
            )));
        }

        debug!(provider = label, bytes = written, path = %dest.display(), "Audio downloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        let google = SpeechProvider::Google {
            endpoint: GOOGLE_TTS_ENDPOINT.to_string(),
        };
        let local = SpeechProvider::LocalAi {
            endpoint: "http://localhost:8080/v1/audio/speech".to_string(),
            model: "tts-1".to_string(),
            response_format: "wav".to_string(),
        };

        assert_eq!(google.name(), "google");
        assert_eq!(google.extension(), "mp3");
        assert_eq!(local.name(), "localai");
        assert_eq!(local.extension(), "wav");
        assert_eq!(local.endpoint(), "http://localhost:8080/v1/audio/speech");
    }

    #[test]
    fn test_speech_request_shape() {
        let body = serde_json::to_value(SpeechRequest {
            model: "tts-1",
            input: "hello",
            response_format: "mp3",
        })
        .unwrap_or_default();

        assert_eq!(
            body,
            serde_json::json!({"model": "tts-1", "input": "hello", "response_format": "mp3"})
        );
    }
}
