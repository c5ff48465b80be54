//! Plain-text medical report from a finished consultation.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const MISSING_DETAILS_MESSAGE: &str = "Cannot generate report. Missing patient details.";
const NOT_PROVIDED: &str = "Not provided";
const RULE: &str = "==========================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalReport {
    pub patient_name: String,
    pub age: String,
    pub gender: String,
    /// Known illnesses, free text.
    pub history: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl MedicalReport {
    pub fn has_patient_details(&self) -> bool {
        [&self.patient_name, &self.age, &self.gender]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Render with the current local time.
    pub fn render(&self) -> String {
        self.render_at(Local::now().naive_local())
    }

    pub fn render_at(&self, generated_at: NaiveDateTime) -> String {
        if !self.has_patient_details() {
            return MISSING_DETAILS_MESSAGE.to_string();
        }

        let history = if self.history.trim().is_empty() {
            "None"
        } else {
            self.history.trim()
        };

        let mut out = String::new();
        out.push_str(RULE);
        out.push_str("\n                              MEDICAL REPORT\n");
        out.push_str(RULE);
        out.push_str("\n\n**Patient Information**\n");
        out.push_str(&format!("- **Name**   : {}\n", self.patient_name.trim()));
        out.push_str(&format!("- **Age**    : {}\n", self.age.trim()));
        out.push_str(&format!("- **Gender** : {}\n", self.gender.trim()));
        out.push_str(&format!("- **History**: {history}\n"));
        out.push_str(&format!(
            "- **Date**   : {}\n\n",
            generated_at.format("%Y-%m-%d %H:%M")
        ));
        out.push_str(THIN_RULE);
        out.push_str("\n**Diagnosis**\n");
        out.push_str(&bullet_points(&self.diagnosis));
        out.push_str("\n\n");
        out.push_str(THIN_RULE);
        out.push_str("\n**Treatment & Recommendations**\n");
        out.push_str(&bullet_points(&self.treatment));
        out.push_str("\n\n");
        out.push_str(THIN_RULE);
        out.push_str("\n\nAttestation by a Medical Professional: _____________________________\n");
        out.push_str("**Notes**\n");
        out.push_str("This medical report has been automatically generated using AI.\n");
        out.push_str("Please consult a qualified physician for confirmation and further advice.\n\n");
        out.push_str(RULE);
        out.push('\n');
        out
    }
}

/// One bullet per non-empty sentence, splitting on '.'.
pub fn bullet_points(text: &str) -> String {
    let points: Vec<String> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("- {s}"))
        .collect();
    if points.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        points.join("\n")
    }
}
