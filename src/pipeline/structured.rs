//! Structured output embedded in free model text.
//!
//! Model replies are untrusted prose that should contain one JSON object.
//! The object is located by scanning for the first `{` and the last `}`;
//! whatever lies between (inclusive) is parsed strictly. Nested unbalanced
//! braces or several objects in one reply are not supported: only one
//! extraction window is ever tried.

use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::inference::InferenceError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuredOutputError {
    #[error("No JSON object found in model output")]
    MissingObject,

    #[error("JSON parsing error: {0}")]
    Json(String),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Slice between the first `{` and the last `}` (inclusive).
pub fn extract_json_object(text: &str) -> Result<&str, StructuredOutputError> {
    let start = text.find('{').ok_or(StructuredOutputError::MissingObject)?;
    let end = text.rfind('}').ok_or(StructuredOutputError::MissingObject)?;
    if end < start {
        return Err(StructuredOutputError::MissingObject);
    }
    Ok(&text[start..=end])
}

/// Extract and strictly deserialize the embedded object.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, StructuredOutputError> {
    let json = extract_json_object(text)?;
    serde_json::from_str(json).map_err(|e| StructuredOutputError::Json(e.to_string()))
}

/// Parse a model reply, or fall back to a pure default on any failure
/// (transport error, missing braces, invalid structure).
///
/// `label` names the caller in logs; model text is never logged.
pub fn parse_or_fallback<T, F>(
    label: &str,
    reply: Result<String, InferenceError>,
    fallback: F,
) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match reply
        .map_err(StructuredOutputError::from)
        .and_then(|text| parse_structured(&text))
    {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(step = label, error = %e, "Structured output unusable, using fallback");
            fallback()
        }
    }
}

/// Deserialize an enum label through a case-insensitive `parse`.
///
/// Models capitalize labels freely ("High", "Diagnosis"); the enums
/// accept any casing instead of discarding the whole reply.
pub fn deserialize_label<'de, D, T>(
    deserializer: D,
    parse: fn(&str) -> Option<T>,
    expected: &'static str,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::invalid_value(Unexpected::Str(&raw), &expected))
}
