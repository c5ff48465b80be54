use std::collections::BTreeMap;

use super::prompts::{
    chest_pain_prompt, consult_prompt, headache_prompt, medication_safety_prompt,
    medication_therapy_prompt,
};
use super::types::{AssessmentRequest, PatientData, Specialty};
use super::SpecialistError;
use crate::pipeline::inference::{InferenceError, SharedClient};

/// One specialty bound to the shared inference backend.
pub struct Specialist {
    specialty: Specialty,
    client: SharedClient,
}

impl Specialist {
    pub fn new(specialty: Specialty, client: SharedClient) -> Self {
        Self { specialty, client }
    }

    pub fn specialty(&self) -> Specialty {
        self.specialty
    }

    /// Generic consultation. Missing patient data degrades to a placeholder.
    pub fn consult(
        &self,
        symptoms: &str,
        data: Option<&PatientData>,
    ) -> Result<String, InferenceError> {
        tracing::info!(specialty = %self.specialty, "Specialist consultation");
        self.client
            .submit(&consult_prompt(self.specialty, symptoms, data))
            .map(|reply| reply.trim().to_string())
    }

    fn assess(
        &self,
        request: &AssessmentRequest,
        data: Option<&PatientData>,
    ) -> Result<String, InferenceError> {
        let prompt = match request {
            AssessmentRequest::ChestPain { symptoms } => chest_pain_prompt(symptoms, data),
            AssessmentRequest::Headache { symptoms } => headache_prompt(symptoms, data),
            AssessmentRequest::MedicationSafety {
                medications,
                symptoms,
            } => medication_safety_prompt(medications, symptoms, data),
            AssessmentRequest::MedicationTherapy { diagnosis } => {
                medication_therapy_prompt(diagnosis, data)
            }
        };
        tracing::info!(specialty = %self.specialty, "Specialized assessment");
        self.client
            .submit(&prompt)
            .map(|reply| reply.trim().to_string())
    }
}

/// Fixed, read-only mapping from specialty to specialist capability.
///
/// Built once and shared by every coordinator session.
pub struct SpecialistRegistry {
    specialists: BTreeMap<Specialty, Specialist>,
}

impl SpecialistRegistry {
    /// Registry with every known specialty.
    pub fn with_all(client: SharedClient) -> Self {
        Self::with_specialties(client, Specialty::all())
    }

    pub fn with_specialties(client: SharedClient, specialties: &[Specialty]) -> Self {
        let specialists = specialties
            .iter()
            .map(|sp| (*sp, Specialist::new(*sp, client.clone())))
            .collect();
        Self { specialists }
    }

    /// Registry with no specialists; routed consultations are skipped.
    pub fn empty() -> Self {
        Self {
            specialists: BTreeMap::new(),
        }
    }

    pub fn get(&self, specialty: Specialty) -> Option<&Specialist> {
        self.specialists.get(&specialty)
    }

    pub fn contains(&self, specialty: Specialty) -> bool {
        self.specialists.contains_key(&specialty)
    }

    pub fn specialties(&self) -> impl Iterator<Item = Specialty> + '_ {
        self.specialists.keys().copied()
    }

    /// Generic consult by name.
    pub fn consult(
        &self,
        specialty: Specialty,
        symptoms: &str,
        data: Option<&PatientData>,
    ) -> Result<String, SpecialistError> {
        let specialist = self
            .get(specialty)
            .ok_or(SpecialistError::NotRegistered(specialty))?;
        Ok(specialist.consult(symptoms, data)?)
    }

    /// Specialized assessment, dispatched to the owning specialty.
    pub fn assess(
        &self,
        request: &AssessmentRequest,
        data: Option<&PatientData>,
    ) -> Result<String, SpecialistError> {
        let specialty = request.specialty();
        let specialist = self
            .get(specialty)
            .ok_or(SpecialistError::NotRegistered(specialty))?;
        Ok(specialist.assess(request, data)?)
    }
}
