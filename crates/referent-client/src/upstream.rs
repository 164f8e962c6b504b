//! Normalisation of provider error bodies.
//!
//! Providers disagree on where the human-readable message lives:
//! OpenAI-style `{"error": {"message": ..}}`, Hugging Face `{"error": ".."}`,
//! plain `{"message": ..}`, or an array of error objects.

use reqwest::StatusCode;
use serde_json::Value;

/// Longest raw body echoed back to the caller.
const MAX_RAW_BODY_CHARS: usize = 500;

/// Find a human-readable message inside a JSON error body.
pub fn message_from_json(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let candidates = [
        value.pointer("/error/message"),
        value.get("error"),
        value.get("message"),
        value.get("details"),
        value.pointer("/0/error"),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// Message for a failed upstream response: JSON field, then raw body, then status phrase.
pub fn error_message(status: StatusCode, body: &str, fallback: &str) -> String {
    if let Some(message) = message_from_json(body) {
        return message;
    }

    let raw = body.trim();
    if !raw.is_empty() {
        return raw.chars().take(MAX_RAW_BODY_CHARS).collect();
    }

    match status.canonical_reason() {
        Some(reason) => format!("{fallback}: {reason}"),
        None => fallback.to_string(),
    }
}
