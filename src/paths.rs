//! XDG-style path utilities for configuration and cache directories.
//!
//! XDG Base Directory conventions are preferred over OS-specific locations
//! so the layout is the same on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "clipling";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/clipling` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/clipling` otherwise
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Returns the cache directory.
///
/// Resolution order:
/// 1. `$XDG_CACHE_HOME/clipling` if `XDG_CACHE_HOME` is set
/// 2. `~/.cache/clipling` otherwise
pub fn cache_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

/// Directory holding synthesized speech and its index.
pub fn speech_cache_dir() -> Result<PathBuf> {
    Ok(cache_dir()?.join("tts"))
}

fn xdg_dir(env_var: &str, home_fallback: &str) -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var(env_var)
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(home_fallback).join(APP_DIR))
}
