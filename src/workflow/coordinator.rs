use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::context::PatientContext;
use super::monitoring::{run_monitoring, MonitoringOutcome};
use super::stages::{run_pipeline, DiagnosisOutcome, StageServices};
use super::WorkflowError;
use crate::config::{ConsultConfig, ModelTask};
use crate::history::{ChartRenderer, NoChart, SqliteVitalsStore, VitalsHistory};
use crate::pipeline::intent::{IntentClassifier, IntentRecord};
use crate::pipeline::inference::{OllamaClient, RetryingClient, SharedClient};
use crate::pipeline::safety::{SafetyPolicy, SafetyValidator};
use crate::pipeline::specialists::{SpecialistRegistry, SpecialistRouter};
use crate::pipeline::triage::{EmergencyTriage, RelevanceGate, TriageAssessment};

/// Top-level state holder for one consultation session.
///
/// Owns its `PatientContext` exclusively; create one coordinator per
/// session. Only the specialist registry is meant to be shared.
pub struct WorkflowCoordinator {
    session_id: Uuid,
    clinical: SharedClient,
    monitoring: SharedClient,
    classifier: IntentClassifier,
    relevance: RelevanceGate,
    router: SpecialistRouter,
    registry: Arc<SpecialistRegistry>,
    safety: SafetyValidator,
    emergency: EmergencyTriage,
    history: Option<Box<dyn VitalsHistory + Send>>,
    charts: Box<dyn ChartRenderer + Send>,
    context: PatientContext,
}

impl WorkflowCoordinator {
    /// Coordinator with every specialty registered, no history store,
    /// and the default (fail-open) safety policy.
    pub fn new(clinical: SharedClient, monitoring: SharedClient) -> Self {
        let registry = Arc::new(SpecialistRegistry::with_all(clinical.clone()));
        Self {
            session_id: Uuid::new_v4(),
            classifier: IntentClassifier::new(clinical.clone()),
            relevance: RelevanceGate::new(clinical.clone()),
            router: SpecialistRouter::new(),
            registry,
            safety: SafetyValidator::new(clinical.clone()),
            emergency: EmergencyTriage::new(clinical.clone()),
            history: None,
            charts: Box::new(NoChart),
            context: PatientContext::new(),
            clinical,
            monitoring,
        }
    }

    /// Build the production coordinator: Ollama clients behind retries
    /// and the SQLite history store at the configured path.
    pub fn from_config(config: &ConsultConfig) -> Result<Self, WorkflowError> {
        let clinical = retrying_client(config, config.model_for(ModelTask::Diagnosis));
        let monitoring = retrying_client(config, config.model_for(ModelTask::Monitoring));
        let store = SqliteVitalsStore::open(&config.history_db)?;

        tracing::info!(
            ollama_url = %config.ollama_url,
            clinical_model = %config.clinical_model,
            monitoring_model = %config.monitoring_model,
            max_retries = config.max_retries,
            "Coordinator configured"
        );

        Ok(Self::new(clinical, monitoring)
            .with_safety_policy(config.safety_policy)
            .with_history(Box::new(store)))
    }

    /// Share a registry across sessions instead of building one per coordinator.
    pub fn with_registry(mut self, registry: Arc<SpecialistRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_safety_policy(mut self, policy: SafetyPolicy) -> Self {
        self.safety = SafetyValidator::with_policy(self.clinical.clone(), policy);
        self
    }

    pub fn with_history(mut self, history: Box<dyn VitalsHistory + Send>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_chart_renderer(mut self, charts: Box<dyn ChartRenderer + Send>) -> Self {
        self.charts = charts;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn context(&self) -> &PatientContext {
        &self.context
    }

    pub fn registry(&self) -> &Arc<SpecialistRegistry> {
        &self.registry
    }

    /// Triage, diagnosis, optional specialist consult, treatment and safety
    /// validation, in that order.
    ///
    /// Only the relevance gate can end the run early. Generation failures
    /// in the diagnosis, specialist or treatment steps are returned as
    /// `WorkflowError::Generation`.
    pub fn coordinate_diagnosis_workflow(
        &mut self,
        symptoms: &str,
    ) -> Result<DiagnosisOutcome, WorkflowError> {
        let _span = tracing::info_span!(
            "diagnosis_workflow",
            session = %self.session_id,
            input_len = symptoms.len()
        )
        .entered();

        let services = StageServices {
            clinical: self.clinical.as_ref(),
            relevance: &self.relevance,
            router: &self.router,
            registry: &self.registry,
            safety: &self.safety,
        };
        run_pipeline(&services, &mut self.context, symptoms)
    }

    /// Summarize the patient's most recent vitals.
    pub fn coordinate_monitoring_workflow(
        &mut self,
        patient_id: &str,
    ) -> Result<MonitoringOutcome, WorkflowError> {
        let _span =
            tracing::info_span!("monitoring_workflow", session = %self.session_id).entered();

        let history = self
            .history
            .as_deref()
            .map(|h| h as &dyn VitalsHistory);
        run_monitoring(
            self.monitoring.as_ref(),
            history,
            self.charts.as_ref(),
            &mut self.context,
            patient_id,
        )
    }

    pub fn analyze_intent(&self, input: &str) -> IntentRecord {
        self.classifier.classify(input)
    }

    pub fn emergency_triage(&self, symptoms: &str) -> TriageAssessment {
        self.emergency.triage(symptoms)
    }
}

fn retrying_client(config: &ConsultConfig, model: &str) -> SharedClient {
    let client = OllamaClient::new(&config.ollama_url, model, config.timeout_secs);
    Arc::new(RetryingClient::new(
        client,
        config.max_retries,
        Duration::from_millis(config.retry_base_delay_ms),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::history::Vitals;
    use crate::pipeline::inference::{MockInferenceClient, ScriptedInferenceClient};
    use crate::pipeline::intent::{Intent, Urgency};
    use crate::pipeline::safety::RiskLevel;
    use crate::pipeline::specialists::Specialty;
    use crate::pipeline::triage::{Disposition, TriageUrgency};

    fn mock(reply: &str) -> SharedClient {
        Arc::new(MockInferenceClient::new(reply))
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = WorkflowCoordinator::new(mock("x"), mock("y"));
        let b = WorkflowCoordinator::new(mock("x"), mock("y"));
        assert_ne!(a.session_id(), b.session_id());
        assert!(a.context().interactions().is_empty());
    }

    #[test]
    fn registry_can_be_shared() {
        let registry = Arc::new(SpecialistRegistry::with_specialties(
            mock("x"),
            &[Specialty::Neurology],
        ));
        let a = WorkflowCoordinator::new(mock("x"), mock("y")).with_registry(registry.clone());
        let b = WorkflowCoordinator::new(mock("x"), mock("y")).with_registry(registry.clone());
        assert!(Arc::ptr_eq(a.registry(), b.registry()));
        assert_eq!(Arc::strong_count(&registry), 3);
    }

    #[test]
    fn analyze_intent_falls_back_on_prose() {
        let coordinator = WorkflowCoordinator::new(mock("I am not sure."), mock("y"));
        let record = coordinator.analyze_intent("My back hurts");
        assert_eq!(record.intent, Intent::Diagnosis);
        assert_eq!(record.urgency, Urgency::Medium);
    }

    #[test]
    fn emergency_triage_parses_model_reply() {
        let reply = r#"{"urgency": "IMMEDIATE", "disposition": "911",
            "red_flags": ["crushing chest pain"], "immediate_actions": ["Call 911"]}"#;
        let coordinator = WorkflowCoordinator::new(mock(reply), mock("y"));
        let assessment = coordinator.emergency_triage("crushing chest pain");
        assert_eq!(assessment.urgency, TriageUrgency::Immediate);
        assert_eq!(assessment.disposition, Disposition::EmergencyServices);
    }

    #[test]
    fn monitoring_uses_monitoring_client() {
        let store = SqliteVitalsStore::open_in_memory().unwrap();
        store
            .record(
                "p1",
                &Vitals {
                    temperature: Some(38.4),
                    ..Default::default()
                },
            )
            .unwrap();
        let clinical = Arc::new(ScriptedInferenceClient::new("clinical"));
        let mut coordinator =
            WorkflowCoordinator::new(clinical.clone(), mock("Mild fever, improving."))
                .with_history(Box::new(store));

        let out = coordinator.coordinate_monitoring_workflow("p1").unwrap();

        assert_eq!(out.summary, "Mild fever, improving.");
        assert_eq!(clinical.call_count(), 0);
        assert_eq!(coordinator.context().interactions().len(), 1);
    }

    #[test]
    fn monitoring_without_store() {
        let mut coordinator = WorkflowCoordinator::new(mock("x"), mock("y"));
        let out = coordinator.coordinate_monitoring_workflow("p1").unwrap();
        assert_eq!(out.summary, "No health data found.");
        assert!(out.chart_ref.is_none());
    }

    #[test]
    fn fail_closed_policy_flags_unparsable_verdict() {
        let client = Arc::new(
            ScriptedInferenceClient::new("unused")
                .respond_when("safety validator", "Looks fine to me.")
                .respond_when("treatment recommendation assistant", "Rest.")
                .respond_when("possible diagnosis", "Tension headache")
                .respond_when("medically relevant", "Yes"),
        );
        let mut coordinator = WorkflowCoordinator::new(client, mock("y"))
            .with_registry(Arc::new(SpecialistRegistry::empty()))
            .with_safety_policy(SafetyPolicy::FailClosed);

        let out = coordinator
            .coordinate_diagnosis_workflow("pressure behind my eyes")
            .unwrap();

        assert!(out.treatment.starts_with("⚠️ **SAFETY ALERT**: Safety validation unavailable"));
        assert!(out.treatment.ends_with("Rest."));
        assert!(!out.safety.unwrap().safe);
    }

    #[test]
    fn unsafe_verdict_with_uppercase_risk_is_flagged() {
        let client = Arc::new(
            ScriptedInferenceClient::new("unused")
                .respond_when(
                    "safety validator",
                    r#"{"safe": false, "warning": "max dose exceeded", "risk_level": "CRITICAL"}"#,
                )
                .respond_when("treatment recommendation assistant", "Ibuprofen 1200mg.")
                .respond_when("possible diagnosis", "Tension headache")
                .respond_when("medically relevant", "Yes"),
        );
        let mut coordinator = WorkflowCoordinator::new(client, mock("y"))
            .with_registry(Arc::new(SpecialistRegistry::empty()));

        let out = coordinator
            .coordinate_diagnosis_workflow("pressure behind my eyes")
            .unwrap();

        assert_eq!(
            out.treatment,
            "⚠️ **SAFETY ALERT**: max dose exceeded\n\nIbuprofen 1200mg."
        );
        assert_eq!(out.safety.unwrap().risk_level, RiskLevel::Critical);
    }

    #[test]
    fn from_config_opens_history_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsultConfig {
            history_db: dir.path().join("history.db"),
            ..ConsultConfig::default()
        };
        let coordinator = WorkflowCoordinator::from_config(&config).unwrap();
        assert!(config.history_db.exists());
        assert_eq!(coordinator.registry().specialties().count(), Specialty::all().len());
    }
}
