//! Structured extraction — recovers a JSON value from free-form model output.
//!
//! Models do not reliably honor "return only JSON" instructions; the payload
//! is often wrapped in commentary or markdown code fences. Extraction is a
//! best-effort heuristic and every caller must treat failure as recoverable.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no parseable JSON in model output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Isolates the JSON-bearing substring of a model response: the first
/// ```json fence if present, else the first generic ``` fence, else the
/// text verbatim. A missing closing fence takes the remainder of the text.
pub fn isolate_fenced(text: &str) -> &str {
    if let Some(inner) = after_fence(text, "```json") {
        return inner;
    }
    if let Some(inner) = after_fence(text, "```") {
        return inner;
    }
    text.trim()
}

fn after_fence<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    let start = text.find(fence)? + fence.len();
    let rest = &text[start..];
    let inner = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(inner.trim())
}

/// Parses the isolated substring as an untyped JSON value.
pub fn extract_json(raw: &str) -> Result<serde_json::Value, ExtractError> {
    Ok(serde_json::from_str(isolate_fenced(raw))?)
}

/// Parses the isolated substring into a typed contract.
pub fn extract_as<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    Ok(serde_json::from_value(extract_json(raw)?)?)
}
