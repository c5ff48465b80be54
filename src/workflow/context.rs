use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::specialists::Specialty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Diagnosis,
    Treatment,
    Monitoring,
}

/// One recorded exchange. Immutable once appended to a context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub timestamp: DateTime<Utc>,
    pub kind: InteractionKind,
    pub content: String,
    pub agent: String,
}

/// Opinion returned by one specialist during a workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialistConsultation {
    pub specialty: Specialty,
    pub opinion: String,
}

/// Running state of one conversation session.
///
/// Owned by exactly one coordinator. The interaction log is append-only;
/// the `current_*` fields hold only the latest completed stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientContext {
    interactions: Vec<Interaction>,
    current_symptoms: String,
    current_diagnosis: String,
    current_treatment: String,
    specialist_consultations: BTreeMap<Specialty, String>,
}

impl PatientContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_interaction(&mut self, kind: InteractionKind, content: &str, agent: &str) {
        self.interactions.push(Interaction {
            timestamp: Utc::now(),
            kind,
            content: content.to_string(),
            agent: agent.to_string(),
        });
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn current_symptoms(&self) -> &str {
        &self.current_symptoms
    }

    pub fn current_diagnosis(&self) -> &str {
        &self.current_diagnosis
    }

    pub fn current_treatment(&self) -> &str {
        &self.current_treatment
    }

    pub fn set_symptoms(&mut self, symptoms: &str) {
        self.current_symptoms = symptoms.to_string();
    }

    pub fn set_diagnosis(&mut self, diagnosis: &str) {
        self.current_diagnosis = diagnosis.to_string();
    }

    pub fn set_treatment(&mut self, treatment: &str) {
        self.current_treatment = treatment.to_string();
    }

    /// Latest opinion per specialty; a repeat consultation overwrites.
    pub fn record_consultation(&mut self, consultation: SpecialistConsultation) {
        self.specialist_consultations
            .insert(consultation.specialty, consultation.opinion);
    }

    pub fn consultations(&self) -> &BTreeMap<Specialty, String> {
        &self.specialist_consultations
    }

    /// Human-readable snapshot for reports and follow-up prompts.
    pub fn summary(&self) -> String {
        format!(
            "Patient Context:\n\
             - Current Symptoms: {}\n\
             - Working Diagnosis: {}\n\
             - Treatment Plan: {}\n\
             - Previous Consultations: {} interactions",
            self.current_symptoms,
            self.current_diagnosis,
            self.current_treatment,
            self.interactions.len()
        )
    }
}
