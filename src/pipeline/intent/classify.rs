use super::types::{Intent, IntentRecord, Urgency};
use crate::pipeline::inference::SharedClient;
use crate::pipeline::prompt_templates::intent_prompt;
use crate::pipeline::structured::parse_or_fallback;

/// Words that mark input as a symptom report when the model can't classify it.
const SYMPTOM_KEYWORDS: &[&str] = &["pain", "hurt", "ache", "symptom"];

/// Model-first intent classifier with a keyword fallback.
pub struct IntentClassifier {
    client: SharedClient,
}

impl IntentClassifier {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }

    /// Classify free text. Never fails: any transport or parse problem
    /// yields the heuristic record for the same input.
    pub fn classify(&self, input: &str) -> IntentRecord {
        let reply = self.client.submit(&intent_prompt(input));
        let record = parse_or_fallback("intent_classification", reply, || {
            classify_by_keywords(input)
        });
        tracing::debug!(
            intent = %record.intent,
            urgency = %record.urgency,
            specialists = record.specialists.len(),
            "Intent classified"
        );
        record
    }
}

/// Deterministic keyword classification (case-insensitive).
pub fn classify_by_keywords(input: &str) -> IntentRecord {
    let lower = input.to_lowercase();

    if SYMPTOM_KEYWORDS.iter().any(|k| lower.contains(k)) {
        IntentRecord {
            intent: Intent::Diagnosis,
            urgency: Urgency::Medium,
            specialists: vec!["general".into()],
            data_needed: vec!["symptoms".into()],
            workflow_steps: vec![
                "validate_input".into(),
                "diagnose".into(),
                "recommend_treatment".into(),
            ],
        }
    } else {
        IntentRecord {
            intent: Intent::General,
            urgency: Urgency::Low,
            specialists: vec!["general".into()],
            data_needed: vec!["symptoms".into()],
            workflow_steps: vec!["validate_input".into(), "diagnose".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pipeline::inference::{InferenceError, MockInferenceClient};

    fn classifier(response: &str) -> IntentClassifier {
        IntentClassifier::new(Arc::new(MockInferenceClient::new(response)))
    }

    #[test]
    fn heuristic_headache_and_pain_is_diagnosis() {
        let record = classify_by_keywords("I have a headache and pain");
        assert_eq!(record.intent, Intent::Diagnosis);
        assert_eq!(record.urgency, Urgency::Medium);
        assert_eq!(record.specialists, vec!["general".to_string()]);
        assert_eq!(record.workflow_steps.len(), 3);
    }

    #[test]
    fn heuristic_is_case_insensitive() {
        assert_eq!(classify_by_keywords("My back HURTS").intent, Intent::Diagnosis);
    }

    #[test]
    fn heuristic_default_is_general_low() {
        let record = classify_by_keywords("What are your opening hours?");
        assert_eq!(record.intent, Intent::General);
        assert_eq!(record.urgency, Urgency::Low);
        assert_eq!(
            record.workflow_steps,
            vec!["validate_input".to_string(), "diagnose".to_string()]
        );
    }

    #[test]
    fn model_json_is_used_when_valid() {
        let c = classifier(
            r#"Here is my analysis:
{"intent": "emergency", "urgency": "emergency", "specialists": ["cardiology"],
 "data_needed": ["vitals"], "workflow_steps": ["triage", "escalate"]}
Stay safe."#,
        );
        let record = c.classify("crushing chest pain");
        assert_eq!(record.intent, Intent::Emergency);
        assert_eq!(record.urgency, Urgency::Emergency);
        assert_eq!(record.specialists, vec!["cardiology".to_string()]);
        assert_eq!(record.workflow_steps, vec!["triage".to_string(), "escalate".to_string()]);
    }

    #[test]
    fn capitalized_model_labels_are_kept() {
        let c = classifier(
            r#"{"intent": "Emergency", "urgency": "High", "specialists": ["cardiology"],
                "data_needed": ["vitals"], "workflow_steps": ["triage"]}"#,
        );
        let record = c.classify("I collapsed an hour ago");
        assert_eq!(record.intent, Intent::Emergency);
        assert_eq!(record.urgency, Urgency::High);
        assert_eq!(record.specialists, vec!["cardiology".to_string()]);
    }

    #[test]
    fn prose_reply_falls_back_to_heuristic() {
        let c = classifier("I think the user wants a diagnosis.");
        assert_eq!(c.classify("I have a headache and pain"), classify_by_keywords("x pain"));
    }

    #[test]
    fn out_of_enum_value_replaces_whole_record() {
        let c = classifier(
            r#"{"intent": "diagnosis", "urgency": "urgent", "specialists": ["neurology"],
                "data_needed": [], "workflow_steps": []}"#,
        );
        let record = c.classify("I have a headache and pain");
        // Nothing from the failed parse survives.
        assert_eq!(record.specialists, vec!["general".to_string()]);
        assert_eq!(record.urgency, Urgency::Medium);
    }

    #[test]
    fn missing_key_falls_back() {
        let c = classifier(r#"{"intent": "treatment", "urgency": "low"}"#);
        assert_eq!(c.classify("hello").intent, Intent::General);
    }

    #[test]
    fn transport_failure_falls_back() {
        let c = IntentClassifier::new(Arc::new(MockInferenceClient::failing(
            InferenceError::Connection {
                endpoint: "http://localhost:11434".into(),
                reason: "refused".into(),
            },
        )));
        assert_eq!(c.classify("stomach ache").intent, Intent::Diagnosis);
    }
}
