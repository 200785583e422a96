//! Grammar-learner requests.
//!
//! The learner endpoint answers with structured JSON that is handed on whole
//! instead of being flattened to a string. Some deployments wrap the payload
//! in an envelope, `{"json": <payload>}`, where `<payload>` is either an
//! object or a string holding serialized JSON; others return the payload
//! directly. Both shapes are accepted.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{FallbackOrchestrator, ResponseMode, RetryPolicy};
use crate::cancel::CancelSignal;
use crate::endpoint::EndpointGroup;
use crate::error::{ApiError, RequestOutcome};

const PREVIEW_CHARS: usize = 80;

/// Only a JSON object carrying a `json` key counts as an envelope.
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Option<T> {
    let Value::Object(mut map) = serde_json::from_str::<Value>(body).ok()? else {
        return None;
    };
    match map.remove("json")? {
        Value::String(inner) => serde_json::from_str(&inner).ok(),
        payload => serde_json::from_value(payload).ok(),
    }
}

fn parse_direct<T: DeserializeOwned>(body: &str) -> Option<T> {
    serde_json::from_str(body).ok()
}

/// Parses a learner body, trying the envelope first and the bare payload second.
///
/// Unlike flat-text endpoints there is no fallback payload here, so a body
/// matching neither shape is a [`ApiError::Parse`] failure.
pub fn parse_learner_response<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    parse_envelope(body)
        .or_else(|| parse_direct(body))
        .ok_or_else(|| {
            let preview: String = body.chars().take(PREVIEW_CHARS).collect();
            ApiError::Parse(format!("learner response is not valid JSON: {preview}"))
        })
}

/// Sends `text` to the learner group and returns the unwrapped JSON payload.
pub async fn learn(
    orchestrator: &FallbackOrchestrator,
    group: &EndpointGroup,
    text: &str,
    policy: RetryPolicy,
    cancel: &CancelSignal,
) -> RequestOutcome<Value> {
    let body = orchestrator
        .dispatch(group, text, ResponseMode::FullBody, policy, cancel)
        .await?;
    parse_learner_response(&body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Lesson {
        title: String,
        rules: Vec<String>,
    }

    #[test]
    fn test_envelope_with_object() {
        let body = r#"{"json":{"title":"Past tense","rules":["add -ed"]}}"#;
        let lesson: Lesson = parse_learner_response(body).unwrap();
        assert_eq!(lesson.title, "Past tense");
        assert_eq!(lesson.rules, vec!["add -ed"]);
    }

    #[test]
    fn test_envelope_with_string_payload() {
        let body = json!({"json": "{\"title\":\"Articles\",\"rules\":[]}"}).to_string();
        let lesson: Lesson = parse_learner_response(&body).unwrap();
        assert_eq!(lesson.title, "Articles");
        assert!(lesson.rules.is_empty());
    }

    #[test]
    fn test_direct_payload() {
        let body = r#"{"title":"Plurals","rules":["add -s"]}"#;
        let lesson: Lesson = parse_learner_response(body).unwrap();
        assert_eq!(lesson.title, "Plurals");
    }

    #[test]
    fn test_untyped_envelope_is_unwrapped() {
        let body = r#"{"json":{"title":"x"}}"#;
        let value: Value = parse_learner_response(body).unwrap();
        assert_eq!(value, json!({"title": "x"}));
    }

    #[test]
    fn test_array_payload_is_kept_whole() {
        let value: Value = parse_learner_response(r#"[{"title":"x"}]"#).unwrap();
        assert_eq!(value, json!([{"title": "x"}]));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = parse_learner_response::<Value>("<html>oops</html>");
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let result = parse_learner_response::<Lesson>(r#"{"json":"not json"}"#);
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
