use crate::pipeline::inference::SharedClient;
use crate::pipeline::prompt_templates::relevance_prompt;

/// Triage gate: decides whether input is medical enough to diagnose.
///
/// Fails closed: a backend failure counts as "not relevant".
pub struct RelevanceGate {
    client: SharedClient,
}

impl RelevanceGate {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }

    pub fn is_medically_relevant(&self, input: &str) -> bool {
        match self.client.submit(&relevance_prompt(input)) {
            Ok(reply) => {
                let relevant = is_affirmative(&reply);
                tracing::info!(relevant, input_len = input.len(), "Relevance gate evaluated");
                relevant
            }
            Err(e) => {
                tracing::warn!(error = %e, "Relevance check failed, treating input as not relevant");
                false
            }
        }
    }
}

/// True when the trimmed, lower-cased reply begins with "yes".
pub fn is_affirmative(reply: &str) -> bool {
    reply.trim().to_lowercase().starts_with("yes")
}
