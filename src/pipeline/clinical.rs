//! Free-text generation steps: primary diagnosis and treatment plan.

use std::sync::LazyLock;

use regex::Regex;

use super::inference::{InferenceClient, InferenceError};
use super::prompt_templates::{diagnosis_prompt, treatment_prompt};

/// `[...]` spans (reference markers, model annotations).
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid bracket regex"));

/// Parenthesised confidence/citation/reference notes.
static META_PARENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(([^)]*(confidence|citation|reference)[^)]*)\)")
        .expect("valid meta-note regex")
});

pub fn generate_diagnosis(
    client: &dyn InferenceClient,
    symptoms: &str,
) -> Result<String, InferenceError> {
    let reply = client.submit(&diagnosis_prompt(symptoms))?;
    Ok(reply.trim().to_string())
}

pub fn generate_treatment(
    client: &dyn InferenceClient,
    symptoms: &str,
    diagnosis: &str,
) -> Result<String, InferenceError> {
    let reply = client.submit(&treatment_prompt(symptoms, diagnosis))?;
    Ok(clean_model_output(&reply))
}

/// Strip citation-style artifacts the treatment prompt asks the model to avoid.
pub fn clean_model_output(text: &str) -> String {
    let without_brackets = BRACKETED.replace_all(text, "");
    META_PARENS
        .replace_all(&without_brackets, "")
        .trim()
        .to_string()
}
