pub mod inference;
pub mod structured; // First-{ / last-} JSON extraction with fallback
pub mod prompt_templates;
pub mod intent;
pub mod triage;
pub mod specialists;
pub mod safety;
pub mod clinical;
pub mod qa;
