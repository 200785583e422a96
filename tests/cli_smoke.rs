#![allow(clippy::unwrap_used)]
//! End-to-end checks of the `clipling` binary.
//!
//! Every invocation passes `--config` and points `XDG_CACHE_HOME` at a temp
//! directory so the user's real files are never touched.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn clipling(temp_dir: &TempDir, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clipling").unwrap();
    cmd.env("XDG_CACHE_HOME", temp_dir.path().join("cache"))
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--config")
        .arg(config);
    cmd
}

fn write_config(temp_dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn help_mentions_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.toml");

    clipling(&temp_dir, &config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fallback"));
}

#[test]
fn version_flag() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.toml");

    clipling(&temp_dir, &config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn endpoints_lists_fallback_order() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        &temp_dir,
        r#"
[endpoints.translate]
default_index = 1

[[endpoints.translate.endpoints]]
name = "alpha"
url = "http://alpha.invalid/translate"

[[endpoints.translate.endpoints]]
name = "beta"
url = "http://beta.invalid/translate"

[[endpoints.translate.endpoints]]
name = "gamma"
url = "http://gamma.invalid/translate"
"#,
    );

    clipling(&temp_dir, &config)
        .args(["endpoints", "translate"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)1\. .*beta.*2\. .*gamma.*3\. .*alpha").unwrap());
}

#[test]
fn endpoints_rejects_unknown_category() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.toml");

    clipling(&temp_dir, &config)
        .args(["endpoints", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown endpoint category"));
}

#[test]
fn translate_without_endpoints_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.toml");

    clipling(&temp_dir, &config)
        .args(["-q", "translate", "--text", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid endpoints"));
}

#[test]
fn invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        &temp_dir,
        r#"
[tts]
cache_expiration_days = 0
"#,
    );

    clipling(&temp_dir, &config)
        .arg("endpoints")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cache_expiration_days"));
}

#[test]
fn cache_info_on_fresh_cache() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.toml");

    clipling(&temp_dir, &config)
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Speech cache"));

    assert!(temp_dir.path().join("cache/clipling/tts").is_dir());
}

#[test]
fn cache_sweep_and_clear() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.toml");

    clipling(&temp_dir, &config)
        .args(["cache", "sweep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 expired entries removed"));

    clipling(&temp_dir, &config)
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Speech cache cleared"));
}
