use std::sync::Arc;

use super::InferenceError;

/// Generation backend abstraction (allows mocking).
///
/// Stateless across calls apart from the model name bound at construction.
pub trait InferenceClient: Send + Sync {
    /// Submit a prompt and return the generated text.
    fn submit(&self, prompt: &str) -> Result<String, InferenceError>;

    /// Model identifier every request is sent to.
    fn model(&self) -> &str;
}

impl<T: InferenceClient + ?Sized> InferenceClient for Arc<T> {
    fn submit(&self, prompt: &str) -> Result<String, InferenceError> {
        (**self).submit(prompt)
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

/// Shared handle used wherever several components talk to the same backend.
pub type SharedClient = Arc<dyn InferenceClient>;
