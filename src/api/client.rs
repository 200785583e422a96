use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::cancel::CancelSignal;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, RequestOutcome};

/// How a successful response body becomes the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseMode {
    /// Use the `text` field of a JSON object, or the raw body if there is none.
    #[default]
    Text,
    /// Return the raw body untouched.
    FullBody,
}

#[derive(Debug, Serialize)]
struct QuestionRequest<'a> {
    question: &'a str,
}

/// Performs single calls against single endpoints.
///
/// Holds no state besides the connection pool, so one instance is shared by
/// every request.
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// POSTs `{"question": text}` to `endpoint` within its own timeout.
    pub async fn call(
        &self,
        endpoint: &Endpoint,
        text: &str,
        mode: ResponseMode,
        cancel: &CancelSignal,
    ) -> RequestOutcome {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ApiError::Cancelled),
            outcome = self.send(endpoint, text, mode) => outcome,
        }
    }

    async fn send(&self, endpoint: &Endpoint, text: &str, mode: ResponseMode) -> RequestOutcome {
        let label = endpoint.to_string();
        let to_error = |err: reqwest::Error| ApiError::from_reqwest(&label, endpoint.timeout_seconds, &err);

        let response = self
            .http
            .post(&endpoint.url)
            .timeout(endpoint.timeout())
            .json(&QuestionRequest { question: text })
            .send()
            .await
            .map_err(to_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(status));
        }

        let body = response.text().await.map_err(to_error)?;

        Ok(match mode {
            ResponseMode::Text => extract_text(body),
            ResponseMode::FullBody => body,
        })
    }
}

/// Pulls the `text` field out of a JSON object body.
///
/// Anything else (plain text, arrays, other objects, a non-string `text`) is
/// returned verbatim.
pub fn extract_text(body: String) -> String {
    let text = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| match value {
            Value::Object(mut map) => match map.remove("text") {
                Some(Value::String(text)) => Some(text),
                _ => None,
            },
            _ => None,
        });
    text.unwrap_or(body)
}
