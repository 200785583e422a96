//! # clipling - resilient translation and speech core
//!
//! `clipling` sends text to remote translation, grammar and speech services.
//! Every request goes through the same layer:
//!
//! - **Ordered fallback**: each request category has up to four endpoints,
//!   tried one at a time starting from the configured default.
//! - **Retry**: a single configured endpoint is retried with linear backoff.
//! - **Speech cache**: synthesized audio is stored on disk, keyed by a hash
//!   of (text, language, provider), and expires after a configurable number
//!   of days.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file
//! clipling ./notes.txt
//!
//! # Fix grammar from stdin
//! pbpaste | clipling fix
//!
//! # Speak some text and print the audio path
//! clipling speak --text "hello" --lang en
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/clipling/config.toml`:
//!
//! ```toml
//! [endpoints.translate]
//! default_index = 0
//!
//! [[endpoints.translate.endpoints]]
//! name = "local"
//! url = "http://localhost:5000/translate"
//! timeout_seconds = 30
//!
//! [retry]
//! count = 2
//! delay_ms = 1000
//!
//! [tts]
//! provider = "google"
//! language = "en"
//! cache_expiration_days = 30
//! ```

/// HTTP client, fallback orchestration and retry.
pub mod api;

/// Content-addressed speech cache with expiry.
pub mod cache;

/// Cancellation signals for in-flight work.
pub mod cancel;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// Endpoints, endpoint groups and fallback order.
pub mod endpoint;

/// Request error taxonomy.
pub mod error;

/// File system utilities.
pub mod fs;

/// Grammar-learner requests and response unwrapping.
pub mod grammar;

/// Input reading from inline text, files and stdin.
pub mod input;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Text-to-speech providers and pipeline.
pub mod speech;

/// Structured logging setup.
pub mod telemetry;

/// Terminal UI components (spinner, colors).
pub mod ui;

pub use error::{ApiError, RequestOutcome};
