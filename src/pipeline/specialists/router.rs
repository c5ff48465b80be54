use super::types::Specialty;

/// Ordered keyword table. The first entry with any matching keyword wins.
pub const ROUTING_TABLE: &[(Specialty, &[&str])] = &[
    (Specialty::Cardiology, &["chest", "heart", "palpitations"]),
    (Specialty::Neurology, &["headache", "seizure", "numbness", "dizziness"]),
    (Specialty::Pharmacology, &["drug", "medication", "dose", "interaction"]),
    (Specialty::Psychiatry, &["depression", "mood", "anxiety", "suicidal", "sleep"]),
    (Specialty::Pulmonology, &["cough", "asthma", "breath", "wheezing"]),
    (Specialty::Gastroenterology, &["stomach", "nausea", "vomit", "digestion"]),
    (Specialty::Dermatology, &["rash", "skin", "itch"]),
    (Specialty::Endocrinology, &["diabetes", "thyroid", "hormone"]),
];

/// Maps symptom text to at most one specialty.
#[derive(Debug, Clone, Copy)]
pub struct SpecialistRouter {
    table: &'static [(Specialty, &'static [&'static str])],
}

impl SpecialistRouter {
    pub fn new() -> Self {
        Self {
            table: ROUTING_TABLE,
        }
    }

    /// First-match lookup over the lower-cased text (substring containment).
    pub fn route(&self, symptoms: &str) -> Option<Specialty> {
        let lower = symptoms.to_lowercase();
        self.table
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(specialty, _)| *specialty)
    }
}

impl Default for SpecialistRouter {
    fn default() -> Self {
        Self::new()
    }
}
