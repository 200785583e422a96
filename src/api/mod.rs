//! HTTP calls against configured endpoints, with ordered fallback and retry.

mod client;
mod orchestrator;
mod retry;

pub use client::{ApiClient, ResponseMode, extract_text};
pub use orchestrator::FallbackOrchestrator;
pub use retry::{DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY, RetryPolicy};
