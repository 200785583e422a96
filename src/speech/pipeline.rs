use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::provider::SpeechClient;
use crate::cache::CacheStore;
use crate::cancel::CancelSignal;
use crate::error::{ApiError, RequestOutcome};

/// Produces playable audio, serving repeats from the cache.
#[derive(Debug, Clone)]
pub struct SpeechPipeline {
    cache: Arc<CacheStore>,
    client: SpeechClient,
}

impl SpeechPipeline {
    pub const fn new(cache: Arc<CacheStore>, client: SpeechClient) -> Self {
        Self { cache, client }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Returns the path of an audio file speaking `text` in `language`.
    ///
    /// Synthesis failures are returned as-is and never cached. If the cache
    /// cannot take the new artifact, the downloaded file is kept in the temp
    /// directory and that path is returned instead.
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        cancel: &CancelSignal,
    ) -> RequestOutcome<PathBuf> {
        let provider = self.client.provider();

        if let Some(path) = self.cache.lookup(text, language, provider.name()).await {
            info!(provider = provider.name(), "Speech served from cache");
            return Ok(path);
        }

        let temp_path = tempfile::Builder::new()
            .prefix("clipling-")
            .suffix(&format!(".{}", provider.extension()))
            .tempfile()
            .map_err(|err| ApiError::Artifact {
                path: std::env::temp_dir(),
                reason: err.to_string(),
            })?
            .into_temp_path();

        debug!(provider = provider.name(), "Cache miss, synthesizing speech");
        self.client
            .synthesize_to(text, language, &temp_path, cancel)
            .await?;

        if let Some(cached) = self
            .cache
            .store(text, language, provider.name(), &temp_path)
            .await
        {
            return Ok(cached);
        }

        warn!("Cache unavailable, keeping downloaded audio in temp directory");
        temp_path.keep().map_err(|err| ApiError::Artifact {
            path: err.path.to_path_buf(),
            reason: err.error.to_string(),
        })
    }
}
