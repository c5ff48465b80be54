use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed set of specialist variants layered over the shared backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialty {
    Cardiology,
    Neurology,
    Pharmacology,
    Psychiatry,
    Pulmonology,
    Gastroenterology,
    Dermatology,
    Endocrinology,
}

impl Specialty {
    /// All specialties, in routing-table order.
    pub fn all() -> &'static [Specialty] {
        &[
            Self::Cardiology,
            Self::Neurology,
            Self::Pharmacology,
            Self::Psychiatry,
            Self::Pulmonology,
            Self::Gastroenterology,
            Self::Dermatology,
            Self::Endocrinology,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cardiology => "cardiology",
            Self::Neurology => "neurology",
            Self::Pharmacology => "pharmacology",
            Self::Psychiatry => "psychiatry",
            Self::Pulmonology => "pulmonology",
            Self::Gastroenterology => "gastroenterology",
            Self::Dermatology => "dermatology",
            Self::Endocrinology => "endocrinology",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|sp| sp.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional structured background folded into specialist prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientData {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub history: Option<String>,
    pub medications: Vec<String>,
    pub bp_readings: Option<String>,
    pub cardiac_history: Option<String>,
}

impl PatientData {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// One `- Label: value` line per known field.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        let mut push = |label: &str, value: Option<&str>| {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                lines.push(format!("- {label}: {v}"));
            }
        };
        push("Age", self.age.as_deref());
        push("Gender", self.gender.as_deref());
        push("History", self.history.as_deref());
        let meds = self.medications.join(", ");
        push("Current Medications", Some(meds.as_str()));
        push("BP History", self.bp_readings.as_deref());
        push("Cardiac History", self.cardiac_history.as_deref());
        lines.join("\n")
    }
}

/// Render optional patient data, or `placeholder` when nothing is known.
pub fn render_patient_data(data: Option<&PatientData>, placeholder: &str) -> String {
    match data.filter(|d| !d.is_empty()) {
        Some(d) => format!("\n{}", d.render()),
        None => placeholder.to_string(),
    }
}

/// Specialized assessments outside the generic `consult` capability.
///
/// Each request belongs to exactly one specialty and is reachable only by
/// direct selection, never through the symptom router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessmentRequest {
    ChestPain { symptoms: String },
    Headache { symptoms: String },
    MedicationSafety { medications: Vec<String>, symptoms: String },
    MedicationTherapy { diagnosis: String },
}

impl AssessmentRequest {
    pub fn specialty(&self) -> Specialty {
        match self {
            Self::ChestPain { .. } => Specialty::Cardiology,
            Self::Headache { .. } => Specialty::Neurology,
            Self::MedicationSafety { .. } | Self::MedicationTherapy { .. } => {
                Specialty::Pharmacology
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(Specialty::from_str("Cardiology"), Some(Specialty::Cardiology));
        assert_eq!(Specialty::from_str(" dermatology "), Some(Specialty::Dermatology));
        assert_eq!(Specialty::from_str("oncology"), None);
    }

    #[test]
    fn as_str_round_trips() {
        for sp in Specialty::all() {
            assert_eq!(Specialty::from_str(sp.as_str()), Some(*sp));
        }
        assert_eq!(Specialty::all().len(), 8);
    }

    #[test]
    fn empty_patient_data_uses_placeholder() {
        assert_eq!(render_patient_data(None, "Limited data available"), "Limited data available");
        assert_eq!(
            render_patient_data(Some(&PatientData::default()), "Limited data available"),
            "Limited data available"
        );
    }

    #[test]
    fn patient_data_renders_known_fields_only() {
        let data = PatientData {
            age: Some("54".into()),
            medications: vec!["aspirin".into(), "metoprolol".into()],
            ..Default::default()
        };
        let rendered = render_patient_data(Some(&data), "Limited data available");
        assert!(rendered.contains("- Age: 54"));
        assert!(rendered.contains("- Current Medications: aspirin, metoprolol"));
        assert!(!rendered.contains("Gender"));
        assert!(!rendered.contains("Limited data"));
    }

    #[test]
    fn assessment_requests_map_to_owning_specialty() {
        assert_eq!(
            AssessmentRequest::ChestPain { symptoms: "x".into() }.specialty(),
            Specialty::Cardiology
        );
        assert_eq!(
            AssessmentRequest::Headache { symptoms: "x".into() }.specialty(),
            Specialty::Neurology
        );
        assert_eq!(
            AssessmentRequest::MedicationTherapy { diagnosis: "x".into() }.specialty(),
            Specialty::Pharmacology
        );
    }
}
