use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::key::CacheKey;
use crate::fs::{atomic_write, remove_if_exists};

/// Name of the persisted index inside the cache directory.
pub const INDEX_FILE: &str = "index.json";

pub const DEFAULT_EXPIRATION_DAYS: u32 = 30;

/// Extension used when the source artifact has none.
const DEFAULT_ARTIFACT_EXTENSION: &str = "mp3";

const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O failed at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to serialize cache index: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CacheError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Metadata for one cached artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    /// First characters of the source text, for humans reading the index.
    pub text_preview: String,
    pub language: String,
    pub provider: String,
    pub created_at: DateTime<Utc>,
    pub file_path: PathBuf,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>, lifetime: TimeDelta) -> bool {
        now > self.created_at + lifetime
    }
}

/// Entry count and disk usage of the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct CacheIndex {
    entries: HashMap<CacheKey, CacheEntry>,
}

/// TTL-bound, content-addressed artifact cache backed by a directory.
///
/// The index is held in memory and rewritten to `index.json` after every
/// mutation. Mutations take the write lock for their whole
/// read-modify-write; lookups share the read lock. Storage failures never
/// reach the caller: lookups degrade to a miss and stores to a no-op.
#[derive(Debug)]
pub struct CacheStore {
    dir: PathBuf,
    lifetime: TimeDelta,
    index: RwLock<CacheIndex>,
}

impl CacheStore {
    /// Opens (creating if needed) the cache at `dir`.
    ///
    /// A missing or unreadable index starts the cache empty; files left
    /// behind are removed by the next [`sweep`](Self::sweep).
    pub async fn open(dir: impl Into<PathBuf>, expiration_days: u32) -> Self {
        let dir = dir.into();

        if let Err(err) = fs::create_dir_all(&dir).await {
            warn!(dir = %dir.display(), error = %err, "Failed to create cache directory");
        }

        let index = match load_index(&dir.join(INDEX_FILE)).await {
            Ok(index) => index,
            Err(err) => {
                warn!(error = %err, "Discarding unreadable cache index");
                CacheIndex::default()
            }
        };
        debug!(dir = %dir.display(), entries = index.entries.len(), "Cache opened");

        Self {
            dir,
            lifetime: TimeDelta::days(i64::from(expiration_days)),
            index: RwLock::new(index),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Artifacts are located by file name inside the cache directory, so a
    /// moved or re-rooted cache keeps its entries.
    fn artifact_path(&self, entry: &CacheEntry) -> PathBuf {
        entry
            .file_path
            .file_name()
            .map_or_else(|| entry.file_path.clone(), |name| self.dir.join(name))
    }

    /// Returns the cached artifact for the tuple, if present and fresh.
    pub async fn lookup(&self, text: &str, language: &str, provider: &str) -> Option<PathBuf> {
        let key = CacheKey::new(text, language, provider);

        let entry = self.index.read().await.entries.get(&key).cloned()?;

        if entry.is_expired(Utc::now(), self.lifetime) {
            debug!(%key, created_at = %entry.created_at, "Cache entry expired");
            self.evict(&entry).await;
            return None;
        }

        let artifact = self.artifact_path(&entry);
        if !fs::try_exists(&artifact).await.unwrap_or(false) {
            warn!(%key, path = %artifact.display(), "Cached artifact is missing");
            self.evict(&entry).await;
            return None;
        }

        debug!(%key, "Cache hit");
        Some(artifact)
    }

    /// Copies `source` into the cache under the tuple's key.
    ///
    /// Returns the path of the cached copy, or `None` if storing failed.
    pub async fn store(
        &self,
        text: &str,
        language: &str,
        provider: &str,
        source: &Path,
    ) -> Option<PathBuf> {
        match self.try_store(text, language, provider, source).await {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(error = %err, "Failed to store cache entry");
                None
            }
        }
    }

    async fn try_store(
        &self,
        text: &str,
        language: &str,
        provider: &str,
        source: &Path,
    ) -> Result<PathBuf, CacheError> {
        let key = CacheKey::new(text, language, provider);
        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or(DEFAULT_ARTIFACT_EXTENSION);
        let target = self.dir.join(format!("{key}.{extension}"));

        let mut index = self.index.write().await;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| CacheError::io(&self.dir, err))?;
        fs::copy(source, &target)
            .await
            .map_err(|err| CacheError::io(&target, err))?;

        let entry = CacheEntry {
            key: key.clone(),
            text_preview: text.chars().take(PREVIEW_CHARS).collect(),
            language: language.to_string(),
            provider: provider.to_string(),
            created_at: Utc::now(),
            file_path: target.clone(),
        };

        if let Some(previous) = index.entries.insert(key.clone(), entry)
            && self.artifact_path(&previous) != target
        {
            remove_artifact(&self.artifact_path(&previous)).await;
        }

        self.persist(&index).await?;
        debug!(%key, path = %target.display(), "Cache entry stored");

        Ok(target)
    }

    /// Drops every expired entry, its artifact, and any orphan file.
    ///
    /// Writes the index once at the end. Returns the number of entries removed.
    pub async fn sweep(&self) -> usize {
        let mut index = self.index.write().await;
        let now = Utc::now();

        let mut stale = Vec::new();
        for entry in index.entries.values() {
            let dangling = !fs::try_exists(self.artifact_path(entry))
                .await
                .unwrap_or(false);
            if dangling || entry.is_expired(now, self.lifetime) {
                stale.push(entry.key.clone());
            }
        }

        for key in &stale {
            if let Some(entry) = index.entries.remove(key) {
                remove_artifact(&self.artifact_path(&entry)).await;
            }
        }

        let orphans = self.remove_orphans(&index).await;

        if !stale.is_empty()
            && let Err(err) = self.persist(&index).await
        {
            warn!(error = %err, "Failed to persist cache index after sweep");
        }

        info!(
            removed = stale.len(),
            orphans,
            remaining = index.entries.len(),
            "Cache sweep finished"
        );
        stale.len()
    }

    /// Deletes the cache directory and starts over empty.
    pub async fn clear_all(&self) -> Result<(), CacheError> {
        let mut index = self.index.write().await;
        index.entries.clear();

        match fs::remove_dir_all(&self.dir).await {
            Err(err) if err.kind() != io::ErrorKind::NotFound => {
                return Err(CacheError::io(&self.dir, err));
            }
            _ => {}
        }
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| CacheError::io(&self.dir, err))?;

        info!(dir = %self.dir.display(), "Cache cleared");
        Ok(())
    }

    pub async fn stats(&self) -> CacheStats {
        let index = self.index.read().await;
        let mut total_bytes = 0;
        for entry in index.entries.values() {
            if let Ok(metadata) = fs::metadata(self.artifact_path(entry)).await {
                total_bytes += metadata.len();
            }
        }
        CacheStats {
            entries: index.entries.len(),
            total_bytes,
        }
    }

    /// Removes `observed` unless it was replaced since it was read.
    async fn evict(&self, observed: &CacheEntry) {
        let mut index = self.index.write().await;
        let unchanged = index
            .entries
            .get(&observed.key)
            .is_some_and(|current| current.created_at == observed.created_at);
        if !unchanged {
            return;
        }

        if let Some(entry) = index.entries.remove(&observed.key) {
            remove_artifact(&self.artifact_path(&entry)).await;
        }
        if let Err(err) = self.persist(&index).await {
            warn!(error = %err, "Failed to persist cache index after eviction");
        }
    }

    async fn remove_orphans(&self, index: &CacheIndex) -> usize {
        let referenced: HashSet<&OsStr> = index
            .entries
            .values()
            .filter_map(|entry| entry.file_path.file_name())
            .collect();

        let mut read_dir = match fs::read_dir(&self.dir).await {
            Ok(read_dir) => read_dir,
            Err(err) => {
                warn!(dir = %self.dir.display(), error = %err, "Failed to scan cache directory");
                return 0;
            }
        };

        let mut removed = 0;
        while let Ok(Some(dir_entry)) = read_dir.next_entry().await {
            let path = dir_entry.path();
            let name_os = dir_entry.file_name();
            let name = name_os.to_string_lossy();
            let is_file = dir_entry.file_type().await.is_ok_and(|t| t.is_file());

            if !is_file || name == INDEX_FILE || name.starts_with('.') {
                continue;
            }
            if !referenced.contains(name_os.as_os_str()) {
                remove_artifact(&path).await;
                removed += 1;
            }
        }
        removed
    }

    async fn persist(&self, index: &CacheIndex) -> Result<(), CacheError> {
        let path = self.index_path();
        let contents = serde_json::to_vec_pretty(index)?;
        atomic_write(&path, &contents)
            .await
            .map_err(|err| CacheError::io(&path, err))
    }
}

async fn load_index(path: &Path) -> Result<CacheIndex, CacheError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(CacheIndex::default()),
        Err(err) => Err(CacheError::io(path, err)),
    }
}

async fn remove_artifact(path: &Path) {
    if let Err(err) = remove_if_exists(path).await {
        warn!(path = %path.display(), error = %err, "Failed to remove cached artifact");
    }
}
