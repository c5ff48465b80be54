use serde::{Deserialize, Serialize};

use crate::pipeline::inference::SharedClient;
use crate::pipeline::prompt_templates::emergency_triage_prompt;
use crate::pipeline::structured::parse_or_fallback;

/// Emergency-medicine urgency tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageUrgency {
    /// Life-threatening, within 15 minutes.
    Immediate,
    /// Serious but stable, within an hour.
    Urgent,
    /// Stable, within 4 hours.
    LessUrgent,
    /// Routine care.
    NonUrgent,
}

/// Where the patient should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    #[serde(rename = "911")]
    EmergencyServices,
    #[serde(rename = "ED")]
    EmergencyDepartment,
    #[serde(rename = "URGENT_CARE")]
    UrgentCare,
    #[serde(rename = "PRIMARY_CARE")]
    PrimaryCare,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub urgency: TriageUrgency,
    pub disposition: Disposition,
    pub red_flags: Vec<String>,
    pub immediate_actions: Vec<String>,
}

impl TriageAssessment {
    /// Used whenever the model's triage can't be parsed.
    pub fn fallback() -> Self {
        Self {
            urgency: TriageUrgency::LessUrgent,
            disposition: Disposition::PrimaryCare,
            red_flags: Vec::new(),
            immediate_actions: vec![
                "Monitor symptoms".to_string(),
                "Seek appropriate care".to_string(),
            ],
        }
    }
}

/// Emergency triage, reachable by direct selection only.
pub struct EmergencyTriage {
    client: SharedClient,
}

impl EmergencyTriage {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }

    pub fn triage(&self, symptoms: &str) -> TriageAssessment {
        let reply = self.client.submit(&emergency_triage_prompt(symptoms));
        let assessment = parse_or_fallback("emergency_triage", reply, TriageAssessment::fallback);
        tracing::info!(
            urgency = ?assessment.urgency,
            disposition = ?assessment.disposition,
            red_flags = assessment.red_flags.len(),
            "Emergency triage completed"
        );
        assessment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pipeline::inference::MockInferenceClient;

    fn triage(reply: &str) -> TriageAssessment {
        EmergencyTriage::new(Arc::new(MockInferenceClient::new(reply))).triage("collapse")
    }

    #[test]
    fn parses_model_assessment() {
        let a = triage(
            r#"Assessment follows.
{"urgency": "IMMEDIATE", "disposition": "911",
 "red_flags": ["loss of consciousness"], "immediate_actions": ["Call 911"]}"#,
        );
        assert_eq!(a.urgency, TriageUrgency::Immediate);
        assert_eq!(a.disposition, Disposition::EmergencyServices);
        assert_eq!(a.red_flags, vec!["loss of consciousness".to_string()]);
    }

    #[test]
    fn less_urgent_and_urgent_care_parse() {
        let a = triage(
            r#"{"urgency": "LESS_URGENT", "disposition": "URGENT_CARE", "red_flags": [], "immediate_actions": []}"#,
        );
        assert_eq!(a.urgency, TriageUrgency::LessUrgent);
        assert_eq!(a.disposition, Disposition::UrgentCare);
    }

    #[test]
    fn prose_falls_back() {
        assert_eq!(triage("Go to the hospital now."), TriageAssessment::fallback());
    }

    #[test]
    fn unknown_disposition_falls_back() {
        let a = triage(
            r#"{"urgency": "URGENT", "disposition": "HOME", "red_flags": [], "immediate_actions": []}"#,
        );
        assert_eq!(a, TriageAssessment::fallback());
    }

    #[test]
    fn fallback_shape() {
        let f = TriageAssessment::fallback();
        assert_eq!(f.urgency, TriageUrgency::LessUrgent);
        assert_eq!(f.disposition, Disposition::PrimaryCare);
        assert!(f.red_flags.is_empty());
        assert_eq!(f.immediate_actions.len(), 2);
    }
}
