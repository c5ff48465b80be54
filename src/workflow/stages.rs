//! Diagnosis workflow as an explicit stage pipeline.
//!
//! Each stage reads the run state built so far and extends it. The
//! composition in `run_pipeline` owns the two branch points: the triage
//! early exit and the conditional specialist step.

use serde::Serialize;

use super::context::{InteractionKind, PatientContext, SpecialistConsultation};
use super::log::{WorkflowLog, FOLLOW_UP_RECOMMENDATIONS};
use super::WorkflowError;
use crate::pipeline::clinical::{generate_diagnosis, generate_treatment};
use crate::pipeline::inference::InferenceClient;
use crate::pipeline::safety::{SafetyValidator, SafetyVerdict};
use crate::pipeline::specialists::{SpecialistRegistry, SpecialistRouter};
use crate::pipeline::triage::RelevanceGate;

/// Diagnosis returned when the relevance gate rejects the input.
pub const NOT_RELEVANT_DIAGNOSIS: &str = "Input not medically relevant";

pub const DIAGNOSIS_AGENT: &str = "diagnosis_agent";
pub const TREATMENT_AGENT: &str = "treatment_agent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Triage,
    PrimaryDiagnosis,
    SpecialistConsultation,
    TreatmentPlanning,
    SafetyValidation,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Triage => "Triage",
            Self::PrimaryDiagnosis => "Primary Diagnosis",
            Self::SpecialistConsultation => "Specialist Consultation",
            Self::TreatmentPlanning => "Treatment Planning",
            Self::SafetyValidation => "Safety Validation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Continue,
    Halt,
}

/// Collaborators the stages call into, borrowed from the coordinator.
pub struct StageServices<'a> {
    pub clinical: &'a dyn InferenceClient,
    pub relevance: &'a RelevanceGate,
    pub router: &'a SpecialistRouter,
    pub registry: &'a SpecialistRegistry,
    pub safety: &'a SafetyValidator,
}

/// State of one diagnosis run as it moves through the stages.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisRun {
    pub symptoms: String,
    pub diagnosis: String,
    pub treatment: String,
    pub consultation: Option<SpecialistConsultation>,
    pub safety: Option<SafetyVerdict>,
    pub log: WorkflowLog,
}

impl DiagnosisRun {
    pub fn new(symptoms: &str) -> Self {
        Self {
            symptoms: symptoms.to_string(),
            ..Default::default()
        }
    }
}

/// Final result handed to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisOutcome {
    pub diagnosis: String,
    pub treatment: String,
    pub log: WorkflowLog,
    /// `None` when the run stopped at triage.
    pub safety: Option<SafetyVerdict>,
}

impl From<DiagnosisRun> for DiagnosisOutcome {
    fn from(run: DiagnosisRun) -> Self {
        Self {
            diagnosis: run.diagnosis,
            treatment: run.treatment,
            log: run.log,
            safety: run.safety,
        }
    }
}

// ═══════════════════════════════════════════
// Stages
// ═══════════════════════════════════════════

pub fn triage(services: &StageServices<'_>, run: &mut DiagnosisRun) -> StageOutcome {
    run.log.record_step(Stage::Triage.label());
    if services.relevance.is_medically_relevant(&run.symptoms) {
        StageOutcome::Continue
    } else {
        run.diagnosis = NOT_RELEVANT_DIAGNOSIS.to_string();
        run.treatment.clear();
        StageOutcome::Halt
    }
}

pub fn primary_diagnosis(
    services: &StageServices<'_>,
    run: &mut DiagnosisRun,
) -> Result<(), WorkflowError> {
    run.log.record_step(Stage::PrimaryDiagnosis.label());
    run.log.record_agent(DIAGNOSIS_AGENT);
    run.diagnosis = generate_diagnosis(services.clinical, &run.symptoms)
        .map_err(WorkflowError::generation(Stage::PrimaryDiagnosis.label()))?;
    Ok(())
}

/// Routed specialist opinion, spliced into the diagnosis.
///
/// Leaves no trace in the log when nothing matches or the routed
/// specialty is not registered.
pub fn specialist_consultation(
    services: &StageServices<'_>,
    run: &mut DiagnosisRun,
) -> Result<(), WorkflowError> {
    let Some(specialty) = services.router.route(&run.symptoms) else {
        tracing::debug!("No specialist matched");
        return Ok(());
    };
    let Some(specialist) = services.registry.get(specialty) else {
        tracing::debug!(specialty = %specialty, "Routed specialty not registered, skipping");
        return Ok(());
    };

    run.log
        .record_step(format!("{}: {specialty}", Stage::SpecialistConsultation.label()));
    run.log.record_agent(specialty.as_str());

    let opinion = specialist
        .consult(&run.symptoms, None)
        .map_err(WorkflowError::generation(Stage::SpecialistConsultation.label()))?;

    run.diagnosis = format!(
        "{}\n\n**Specialist Opinion ({specialty}):**\n{opinion}",
        run.diagnosis
    );
    run.consultation = Some(SpecialistConsultation { specialty, opinion });
    Ok(())
}

pub fn treatment_planning(
    services: &StageServices<'_>,
    run: &mut DiagnosisRun,
) -> Result<(), WorkflowError> {
    run.log.record_step(Stage::TreatmentPlanning.label());
    run.log.record_agent(TREATMENT_AGENT);
    run.treatment = generate_treatment(services.clinical, &run.symptoms, &run.diagnosis)
        .map_err(WorkflowError::generation(Stage::TreatmentPlanning.label()))?;
    Ok(())
}

/// Annotates an unsafe plan with a banner; the plan text itself is kept.
pub fn safety_validation(services: &StageServices<'_>, run: &mut DiagnosisRun) {
    run.log.record_step(Stage::SafetyValidation.label());
    let verdict = services
        .safety
        .validate(&run.symptoms, &run.diagnosis, &run.treatment);
    if !verdict.safe {
        run.treatment = safety_banner(&verdict.warning, &run.treatment);
    }
    run.safety = Some(verdict);
}

pub fn safety_banner(warning: &str, treatment: &str) -> String {
    format!("⚠️ **SAFETY ALERT**: {warning}\n\n{treatment}")
}

// ═══════════════════════════════════════════
// Composition
// ═══════════════════════════════════════════

/// Run every stage in order, mirroring completed stages into `context`.
pub fn run_pipeline(
    services: &StageServices<'_>,
    context: &mut PatientContext,
    symptoms: &str,
) -> Result<DiagnosisOutcome, WorkflowError> {
    let mut run = DiagnosisRun::new(symptoms);

    if triage(services, &mut run) == StageOutcome::Halt {
        tracing::info!("Diagnosis workflow stopped at triage");
        return Ok(run.into());
    }

    primary_diagnosis(services, &mut run)?;
    context.set_symptoms(&run.symptoms);
    context.set_diagnosis(&run.diagnosis);

    specialist_consultation(services, &mut run)?;
    if let Some(consultation) = run.consultation.clone() {
        context.set_diagnosis(&run.diagnosis);
        context.record_consultation(consultation);
    }

    treatment_planning(services, &mut run)?;
    context.set_treatment(&run.treatment);

    safety_validation(services, &mut run);

    context.add_interaction(InteractionKind::Diagnosis, &run.diagnosis, DIAGNOSIS_AGENT);
    context.add_interaction(InteractionKind::Treatment, &run.treatment, TREATMENT_AGENT);
    for recommendation in FOLLOW_UP_RECOMMENDATIONS {
        run.log.add_recommendation(recommendation);
    }

    tracing::info!(
        steps = run.log.steps().len(),
        specialist = run.consultation.as_ref().map(|c| c.specialty.as_str()),
        safe = run.safety.as_ref().map(|v| v.safe),
        "Diagnosis workflow completed"
    );
    Ok(run.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pipeline::inference::{InferenceError, ScriptedInferenceClient, SharedClient};
    use crate::pipeline::specialists::Specialty;

    const SAFE: &str = r#"{"safe": true, "warning": "", "risk_level": "low"}"#;

    struct Harness {
        client: Arc<ScriptedInferenceClient>,
        relevance: RelevanceGate,
        router: SpecialistRouter,
        registry: SpecialistRegistry,
        safety: SafetyValidator,
    }

    impl Harness {
        fn new(client: ScriptedInferenceClient) -> Self {
            Self::with_registry(client, |shared| SpecialistRegistry::with_all(shared))
        }

        fn with_registry(
            client: ScriptedInferenceClient,
            registry: impl FnOnce(SharedClient) -> SpecialistRegistry,
        ) -> Self {
            let client = Arc::new(client);
            let shared: SharedClient = client.clone();
            Self {
                relevance: RelevanceGate::new(shared.clone()),
                router: SpecialistRouter::new(),
                registry: registry(shared.clone()),
                safety: SafetyValidator::new(shared),
                client,
            }
        }

        fn services(&self) -> StageServices<'_> {
            StageServices {
                clinical: self.client.as_ref(),
                relevance: &self.relevance,
                router: &self.router,
                registry: &self.registry,
                safety: &self.safety,
            }
        }
    }

    fn scripted() -> ScriptedInferenceClient {
        ScriptedInferenceClient::new("unused")
            .respond_when("safety validator", SAFE)
            .respond_when("treatment recommendation assistant", "Rest and fluids.")
            .respond_when("cardiologist", "Likely musculoskeletal.")
            .respond_when("possible diagnosis", "Viral infection")
            .respond_when("medically relevant", "Yes")
    }

    #[test]
    fn triage_halt_sets_placeholder_diagnosis() {
        let h = Harness::new(ScriptedInferenceClient::new("No"));
        let mut run = DiagnosisRun::new("what is the weather");
        assert_eq!(triage(&h.services(), &mut run), StageOutcome::Halt);
        assert_eq!(run.diagnosis, NOT_RELEVANT_DIAGNOSIS);
        assert!(run.treatment.is_empty());
        assert_eq!(run.log.steps(), ["Triage"]);
    }

    #[test]
    fn specialist_stage_skips_without_match() {
        let h = Harness::new(scripted());
        let mut run = DiagnosisRun::new("sore throat");
        run.diagnosis = "Pharyngitis".into();
        specialist_consultation(&h.services(), &mut run).unwrap();
        assert!(run.log.steps().is_empty());
        assert_eq!(run.diagnosis, "Pharyngitis");
        assert!(run.consultation.is_none());
        assert_eq!(h.client.call_count(), 0);
    }

    #[test]
    fn specialist_stage_skips_unregistered_specialty() {
        let h = Harness::with_registry(scripted(), |shared| {
            SpecialistRegistry::with_specialties(shared, &[Specialty::Dermatology])
        });
        let mut run = DiagnosisRun::new("chest tightness");
        specialist_consultation(&h.services(), &mut run).unwrap();
        assert!(run.log.steps().is_empty());
        assert!(run.consultation.is_none());
    }

    #[test]
    fn specialist_stage_appends_labeled_opinion() {
        let h = Harness::new(scripted());
        let mut run = DiagnosisRun::new("chest tightness");
        run.diagnosis = "Angina?".into();
        specialist_consultation(&h.services(), &mut run).unwrap();
        assert_eq!(run.log.steps(), ["Specialist Consultation: cardiology"]);
        assert_eq!(run.log.agents_consulted(), ["cardiology"]);
        assert_eq!(
            run.diagnosis,
            "Angina?\n\n**Specialist Opinion (cardiology):**\nLikely musculoskeletal."
        );
        assert_eq!(run.consultation.unwrap().specialty, Specialty::Cardiology);
    }

    #[test]
    fn diagnosis_failure_names_the_stage() {
        let h = Harness::new(
            ScriptedInferenceClient::new("unused")
                .fail_when("possible diagnosis", InferenceError::Timeout { duration_secs: 5 }),
        );
        let mut run = DiagnosisRun::new("fever");
        let err = primary_diagnosis(&h.services(), &mut run).unwrap_err();
        match err {
            WorkflowError::Generation { stage, source } => {
                assert_eq!(stage, "Primary Diagnosis");
                assert_eq!(source, InferenceError::Timeout { duration_secs: 5 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unsafe_verdict_prepends_banner() {
        let h = Harness::new(ScriptedInferenceClient::new(
            r#"{"safe": false, "warning": "check dose", "risk_level": "medium"}"#,
        ));
        let mut run = DiagnosisRun::new("fever");
        run.treatment = "Take 4g paracetamol.".into();
        safety_validation(&h.services(), &mut run);
        assert_eq!(
            run.treatment,
            "⚠️ **SAFETY ALERT**: check dose\n\nTake 4g paracetamol."
        );
        assert!(!run.safety.unwrap().safe);
    }

    #[test]
    fn safe_verdict_leaves_treatment_alone() {
        let h = Harness::new(ScriptedInferenceClient::new(SAFE));
        let mut run = DiagnosisRun::new("fever");
        run.treatment = "Fluids.".into();
        safety_validation(&h.services(), &mut run);
        assert_eq!(run.treatment, "Fluids.");
        assert_eq!(run.log.steps(), ["Safety Validation"]);
    }

    #[test]
    fn pipeline_updates_context() {
        let h = Harness::new(scripted());
        let mut ctx = PatientContext::new();
        let outcome = run_pipeline(&h.services(), &mut ctx, "chest ache").unwrap();

        assert_eq!(ctx.current_symptoms(), "chest ache");
        assert_eq!(ctx.current_diagnosis(), outcome.diagnosis);
        assert_eq!(ctx.current_treatment(), "Rest and fluids.");
        assert_eq!(ctx.interactions().len(), 2);
        assert!(ctx.consultations().contains_key(&Specialty::Cardiology));
        assert_eq!(outcome.log.recommendations().len(), 3);
    }

    #[test]
    fn pipeline_halt_leaves_context_untouched() {
        let h = Harness::new(ScriptedInferenceClient::new("no"));
        let mut ctx = PatientContext::new();
        let outcome = run_pipeline(&h.services(), &mut ctx, "tell me a joke").unwrap();
        assert!(outcome.safety.is_none());
        assert!(outcome.log.recommendations().is_empty());
        assert!(ctx.interactions().is_empty());
        assert_eq!(ctx.current_symptoms(), "");
    }
}
