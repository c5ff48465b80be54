//! Single-question medical Q&A, outside the diagnosis workflow.

use super::inference::{InferenceError, SharedClient};
use super::prompt_templates::medical_qa_prompt;

const MEDICAL_KEYWORDS: &[&str] = &[
    "disease",
    "disorder",
    "infection",
    "bacteria",
    "virus",
    "treatment",
    "symptoms",
    "cancer",
    "arthritis",
    "diabetes",
    "antibiotic",
    "fever",
];

pub const EMPTY_QUESTION_MESSAGE: &str = "Please mention your query clearly.";

/// Cheap keyword check for whether a question is medical.
pub fn is_medical_question(question: &str) -> bool {
    let lower = question.to_lowercase();
    MEDICAL_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub struct MedicalQa {
    client: SharedClient,
}

impl MedicalQa {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }

    pub fn answer(&self, question: &str) -> Result<String, InferenceError> {
        if question.trim().is_empty() {
            return Ok(EMPTY_QUESTION_MESSAGE.to_string());
        }
        if !is_medical_question(question) {
            tracing::warn!("Question has no medical keywords; answering anyway");
        }
        let reply = self.client.submit(&medical_qa_prompt(question.trim()))?;
        Ok(reply.trim().to_string())
    }
}
