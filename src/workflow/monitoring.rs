use serde::Serialize;

use super::context::{InteractionKind, PatientContext};
use super::WorkflowError;
use crate::history::{render_recent, ChartRenderer, VitalsHistory};
use crate::pipeline::inference::InferenceClient;
use crate::pipeline::prompt_templates::monitoring_summary_prompt;

/// Returned when no history store is configured.
pub const NO_HISTORY_MESSAGE: &str = "No health data found.";
/// Returned when the store has nothing for the patient.
pub const NO_ENTRIES_MESSAGE: &str = "No entries found for this patient.";
/// How many of the latest records go into the summary prompt.
pub const RECENT_RECORDS: usize = 3;

pub const MONITORING_AGENT: &str = "monitoring_agent";
const STAGE: &str = "Monitoring Summary";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitoringOutcome {
    pub summary: String,
    pub chart_ref: Option<String>,
}

impl MonitoringOutcome {
    fn without_chart(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            chart_ref: None,
        }
    }
}

/// History lookup followed by a model-written trend summary.
pub fn run_monitoring(
    client: &dyn InferenceClient,
    history: Option<&dyn VitalsHistory>,
    charts: &dyn ChartRenderer,
    context: &mut PatientContext,
    patient_id: &str,
) -> Result<MonitoringOutcome, WorkflowError> {
    let Some(history) = history else {
        tracing::info!("Monitoring requested without a history store");
        return Ok(MonitoringOutcome::without_chart(NO_HISTORY_MESSAGE));
    };

    let records = history.records_for(patient_id)?;
    if records.is_empty() {
        tracing::info!("No vitals recorded for patient");
        return Ok(MonitoringOutcome::without_chart(NO_ENTRIES_MESSAGE));
    }

    let prompt = monitoring_summary_prompt(&render_recent(&records, RECENT_RECORDS));
    let summary = client
        .submit(&prompt)
        .map_err(WorkflowError::generation(STAGE))?
        .trim()
        .to_string();
    let chart_ref = charts.render(patient_id, &records);

    context.add_interaction(InteractionKind::Monitoring, &summary, MONITORING_AGENT);
    tracing::info!(
        records = records.len(),
        chart = chart_ref.is_some(),
        "Monitoring summary generated"
    );

    Ok(MonitoringOutcome { summary, chart_ref })
}
