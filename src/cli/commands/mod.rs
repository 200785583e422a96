//! Subcommand implementations.

use anyhow::{Result, anyhow};
use std::path::Path;
use tracing::debug;

use crate::cancel::{CancelSignal, cancel_pair};
use crate::config::{ConfigFile, ConfigManager};
use crate::error::{ApiError, RequestOutcome};

/// Cache maintenance command handler.
pub mod cache;

/// Endpoint listing command handler.
pub mod endpoints;

/// Translate, fix and learn command handler.
pub mod request;

/// Speech synthesis command handler.
pub mod speak;

/// State shared by every command invocation.
pub struct Session {
    pub config: ConfigFile,
    pub quiet: bool,
}

impl Session {
    /// Loads the config from `config_path`, or the default location.
    pub fn load(config_path: Option<&Path>, quiet: bool) -> Result<Self> {
        let manager = match config_path {
            Some(path) => ConfigManager::with_path(path.to_path_buf()),
            None => ConfigManager::new()?,
        };

        debug!(path = %manager.config_path().display(), "Loading config");
        Ok(Self {
            config: manager.load_or_default()?,
            quiet,
        })
    }
}

/// A cancel signal that fires on Ctrl+C.
pub fn cancel_on_ctrl_c() -> CancelSignal {
    let (handle, signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });
    signal
}

/// Turns a request outcome into a CLI-facing error.
pub fn finish<T>(outcome: RequestOutcome<T>) -> Result<T> {
    outcome.map_err(|err| match err {
        ApiError::Cancelled => anyhow!("Cancelled"),
        ApiError::NoEndpoints => anyhow!(
            "No valid endpoints configured\n\n\
             Add endpoints to ~/.config/clipling/config.toml, for example:\n  \
             [[endpoints.translate.endpoints]]\n  \
             name = \"local\"\n  \
             url = \"http://localhost:5000/translate\""
        ),
        other => anyhow::Error::new(other),
    })
}
