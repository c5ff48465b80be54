//! Inference port: submit a prompt to the generation backend, receive text.
//!
//! Every model-backed step of the consultation workflow goes through
//! [`InferenceClient`]. The production implementation is [`OllamaClient`];
//! [`MockInferenceClient`] and [`ScriptedInferenceClient`] stand in for it
//! in tests.

pub mod types;
pub mod ollama;
pub mod retry;

pub use types::*;
pub use ollama::*;
pub use retry::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Ollama is not reachable at {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("Inference request timed out after {duration_secs}s")]
    Timeout { duration_secs: u64 },

    #[error("Ollama returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl InferenceError {
    /// Whether the failure happened on the way to or from the backend
    /// (unreachable, timed out, non-success status) rather than in the payload.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Timeout { .. } | Self::Status { .. }
        )
    }
}
